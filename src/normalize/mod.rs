//! Position-driven normalizers that keep markdown constructs internally
//! consistent.

pub mod emphasis;
pub mod footnotes;

pub use emphasis::{unify_delimiters, DelimiterStyle, EmphasisKind};
pub use footnotes::relocate_footnotes;
