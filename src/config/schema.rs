use crate::normalize::DelimiterStyle;
use serde::Deserialize;
use thiserror::Error;

/// Rule file contents (`.mdshield.toml`).
///
/// Every rule is off unless its table is present.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub emphasis: Option<StyleRule>,
    #[serde(default)]
    pub strong: Option<StyleRule>,
    #[serde(default)]
    pub footnotes: FootnoteRule,
    #[serde(default)]
    pub front_matter: FrontMatterRule,
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.files.extensions.is_empty() {
            issues.push(ValidationIssue::EmptyExtensionList);
        }

        for ext in &self.files.extensions {
            if ext.trim().is_empty() {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "extension is empty".to_string(),
                });
            } else if ext.starts_with('.') {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "write extensions without the leading dot".to_string(),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// Whether any rule would touch a document.
    pub fn has_rules(&self) -> bool {
        self.emphasis.is_some()
            || self.strong.is_some()
            || self.footnotes.move_to_end
            || self.front_matter.ensure
            || self.front_matter.normalize
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StyleRule {
    pub style: DelimiterStyle,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FootnoteRule {
    #[serde(default)]
    pub move_to_end: bool,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FrontMatterRule {
    /// Insert an empty block when missing
    #[serde(default)]
    pub ensure: bool,
    /// Decode and re-encode the YAML
    #[serde(default)]
    pub normalize: bool,
}

/// Every problem found in a rule file, reported together.
#[derive(Debug, Clone, Error)]
#[error("{}", bullet_list(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn bullet_list(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("[files] extensions must name at least one extension")]
    EmptyExtensionList,
    #[error("[files] extension {extension:?}: {message}")]
    InvalidExtension { extension: String, message: String },
}
