//! Structural markdown queries.
//!
//! Wraps the `pulldown-cmark` offset iterator to turn a full structural
//! parse into byte-span positions per element kind. Nothing here mutates
//! text; span acquisition is kept separate from span application
//! ([`crate::splice`]).

pub mod kind;
pub mod parser;
pub mod resolver;

pub use kind::{ElementKind, UnknownKind};
pub use parser::{markdown_options, Element, ParsedDocument};
pub use resolver::{resolve_named, resolve_positions, resolve_positions_many, Position};
