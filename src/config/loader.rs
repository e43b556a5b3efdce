//! Finding and reading the rule file.

use crate::config::schema::{RuleConfig, ValidationError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default rule file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".mdshield.toml";

/// Rules given as a string carry no path; errors name them `<inline>`.
fn origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<inline>".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read rule file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}: rule file is not valid TOML: {source}", origin(.path))]
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },

    #[error("{}: rule file rejected:\n{source}", origin(.path))]
    Invalid {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

/// Decode and validate rules, attributing failures to `path`.
fn parse(input: &str, path: Option<&Path>) -> Result<RuleConfig, ConfigError> {
    let owned = || path.map(Path::to_path_buf);
    let config: RuleConfig = toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
        path: owned(),
        source,
    })?;
    config.validate().map_err(|source| ConfigError::Invalid {
        path: owned(),
        source,
    })?;
    Ok(config)
}

pub fn load_from_str(input: &str) -> Result<RuleConfig, ConfigError> {
    parse(input, None)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleConfig, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading rule file");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, Some(path))
}

/// The rule file to use: `explicit` when given, else `.mdshield.toml` in
/// `dir` when that exists.
pub fn locate(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(dir.join(DEFAULT_CONFIG_FILE)).filter(|candidate| candidate.is_file()),
    }
}

/// Load the file [`locate`] picks; without one, every rule is off.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<RuleConfig, ConfigError> {
    match locate(explicit, dir) {
        Some(path) => load_from_path(path),
        None => Ok(RuleConfig::default()),
    }
}
