//! mdshield: region-protecting rewrites for markdown documents
//!
//! Lets text-level rewrite rules run over a document's prose while code,
//! YAML front matter and links pass through byte-for-byte unmodified.
//!
//! # Architecture
//!
//! All edits compile down to byte-span splices ([`mod@splice`]). Intelligence
//! lives in span acquisition: a full structural parse ([`md`]) yields the
//! positions of each element kind, sorted highest offset first so that a
//! pass can splice its way down the document without re-resolving.
//!
//! - [`protect()`] masks code, then front matter, then links with sentinel
//!   tokens, runs a caller transform, and restores them in reverse order.
//! - [`normalize`] unifies emphasis/strong delimiters and moves footnote
//!   definitions to the end of the document.
//! - [`front_matter`] isolates, transforms, ensures and decodes the leading
//!   YAML block.
//! - [`escape`] keeps inserted user text literal inside `regex`
//!   substitutions and patterns.
//!
//! # Example
//!
//! ```
//! use mdshield::{protect, unify_delimiters, DelimiterStyle, EmphasisKind};
//!
//! let doc = "_keep_ `_code_` and [a_link](x_y.md)";
//! let out = protect(doc, |prose| {
//!     unify_delimiters(prose, DelimiterStyle::Asterisk, EmphasisKind::Emphasis)
//! });
//! assert_eq!(out, "*keep* `_code_` and [a_link](x_y.md)");
//! ```

pub mod config;
pub mod error;
pub mod escape;
pub mod front_matter;
pub mod md;
pub mod normalize;
pub mod protect;
pub mod rules;
pub mod splice;
pub mod workspace;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, RuleConfig};
pub use error::{Error, Result};
pub use escape::{escape_for_pattern, escape_for_substitution};
pub use front_matter::{
    ensure_front_matter, format_front_matter, parse_front_matter, render_front_matter,
    try_format_front_matter,
};
pub use md::{resolve_named, resolve_positions, ElementKind, Position};
pub use normalize::{relocate_footnotes, unify_delimiters, DelimiterStyle, EmphasisKind};
pub use protect::{protect, try_protect, MaskedDocument, RegionKind, Sentinel};
pub use rules::{RuleOutcome, RuleSet};
pub use splice::{apply_descending, splice, Splice};
