//! Configured rule pipeline.
//!
//! Prose rules run inside [`protect`] so code, front matter and links come
//! back byte-identical. Footnote relocation reorders text, which would
//! reorder placeholder tokens, so it runs on the restored document instead;
//! its structural parse already skips code.

use crate::config::RuleConfig;
use crate::error::Result;
use crate::front_matter::{ensure_front_matter, normalize_front_matter};
use crate::normalize::{relocate_footnotes, unify_delimiters, DelimiterStyle, EmphasisKind};
use crate::protect::protect;

/// Result of running a [`RuleSet`] over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "RuleOutcome should be checked for changes"]
pub struct RuleOutcome {
    pub text: String,
    pub changed: bool,
}

/// The passes selected by a [`RuleConfig`], in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    ensure_front_matter: bool,
    normalize_front_matter: bool,
    emphasis: Option<DelimiterStyle>,
    strong: Option<DelimiterStyle>,
    move_footnotes: bool,
}

impl RuleSet {
    pub fn from_config(config: &RuleConfig) -> Self {
        Self {
            ensure_front_matter: config.front_matter.ensure,
            normalize_front_matter: config.front_matter.normalize,
            emphasis: config.emphasis.map(|rule| rule.style),
            strong: config.strong.map(|rule| rule.style),
            move_footnotes: config.footnotes.move_to_end,
        }
    }

    /// Run every enabled pass over `text`.
    ///
    /// Malformed front matter YAML is the only failure and is returned
    /// as-is.
    pub fn apply(&self, text: &str) -> Result<RuleOutcome> {
        let mut current = text.to_string();

        if self.ensure_front_matter {
            current = ensure_front_matter(&current);
        }

        if self.normalize_front_matter {
            current = normalize_front_matter(&current)?;
        }

        if self.emphasis.is_some() || self.strong.is_some() {
            current = protect(&current, |prose| {
                let mut prose = prose.to_string();
                if let Some(style) = self.strong {
                    prose = unify_delimiters(&prose, style, EmphasisKind::Strong);
                }
                if let Some(style) = self.emphasis {
                    prose = unify_delimiters(&prose, style, EmphasisKind::Emphasis);
                }
                prose
            });
        }

        if self.move_footnotes {
            current = relocate_footnotes(&current);
        }

        let changed = current != text;
        Ok(RuleOutcome {
            text: current,
            changed,
        })
    }
}
