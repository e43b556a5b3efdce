use thiserror::Error;

/// Errors surfaced by the library passes.
///
/// Zero matches are never an error: every pass degenerates to a no-op.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to decode front matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter must be a YAML mapping, found {found}")]
    FrontMatterNotMapping { found: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
