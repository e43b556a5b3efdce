use crate::md::{resolve_positions, ElementKind};
use crate::splice::{apply_descending, Splice};
use serde::Deserialize;
use std::fmt;

/// Which delimiter an emphasis or strong span should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterStyle {
    Underscore,
    Asterisk,
    /// Whatever the first span in the document uses
    Consistent,
}

/// Span kinds whose delimiters can be unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisKind {
    Emphasis,
    Strong,
}

impl EmphasisKind {
    fn element(&self) -> ElementKind {
        match self {
            EmphasisKind::Emphasis => ElementKind::Emphasis,
            EmphasisKind::Strong => ElementKind::Strong,
        }
    }

    /// Delimiter run length on each side of the span.
    fn width(&self) -> usize {
        match self {
            EmphasisKind::Emphasis => 1,
            EmphasisKind::Strong => 2,
        }
    }
}

impl fmt::Display for EmphasisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmphasisKind::Emphasis => f.write_str("emphasis"),
            EmphasisKind::Strong => f.write_str("strong"),
        }
    }
}

/// Rewrite every `kind` span to use the delimiter selected by `style`,
/// leaving the span's inner content untouched.
pub fn unify_delimiters(text: &str, style: DelimiterStyle, kind: EmphasisKind) -> String {
    let positions = resolve_positions(text, kind.element());
    // Descending order: the first span in the document is the last one.
    let Some(first) = positions.last() else {
        return text.to_string();
    };

    let marker = match style {
        DelimiterStyle::Underscore => '_',
        DelimiterStyle::Asterisk => '*',
        DelimiterStyle::Consistent => match text.as_bytes()[first.byte_start] {
            b'_' => '_',
            _ => '*',
        },
    };
    let width = kind.width();
    let indicator = marker.to_string().repeat(width);

    let splices: Vec<Splice> = positions
        .iter()
        .filter(|position| position.len() >= 2 * width)
        .flat_map(|position| {
            [
                Splice::new(position.byte_start, position.byte_start + width, &indicator),
                Splice::new(position.byte_end - width, position.byte_end, &indicator),
            ]
        })
        .collect();

    tracing::debug!(%kind, spans = positions.len(), %marker, "unifying delimiters");
    apply_descending(text, splices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_adopts_first_delimiter() {
        assert_eq!(
            unify_delimiters("*a* and _b_", DelimiterStyle::Consistent, EmphasisKind::Emphasis),
            "*a* and *b*"
        );
        assert_eq!(
            unify_delimiters("_a_ and *b*", DelimiterStyle::Consistent, EmphasisKind::Emphasis),
            "_a_ and _b_"
        );
    }

    #[test]
    fn underscore_style() {
        assert_eq!(
            unify_delimiters("*a* and _b_", DelimiterStyle::Underscore, EmphasisKind::Emphasis),
            "_a_ and _b_"
        );
    }

    #[test]
    fn strong_uses_doubled_delimiter() {
        assert_eq!(
            unify_delimiters("__bold__", DelimiterStyle::Asterisk, EmphasisKind::Strong),
            "**bold**"
        );
        assert_eq!(
            unify_delimiters("**bold**", DelimiterStyle::Asterisk, EmphasisKind::Strong),
            "**bold**"
        );
        assert_eq!(
            unify_delimiters(
                "**a** then __b__",
                DelimiterStyle::Underscore,
                EmphasisKind::Strong
            ),
            "__a__ then __b__"
        );
    }

    #[test]
    fn strong_is_not_touched_by_emphasis_pass() {
        assert_eq!(
            unify_delimiters(
                "**bold** and _em_",
                DelimiterStyle::Asterisk,
                EmphasisKind::Emphasis
            ),
            "**bold** and *em*"
        );
    }

    #[test]
    fn inner_content_is_preserved() {
        assert_eq!(
            unify_delimiters(
                "_with `code` and [link](x)_",
                DelimiterStyle::Asterisk,
                EmphasisKind::Emphasis
            ),
            "*with `code` and [link](x)*"
        );
    }

    #[test]
    fn no_spans_is_noop() {
        let text = "plain text with a_snake_case word\n";
        assert_eq!(
            unify_delimiters(text, DelimiterStyle::Asterisk, EmphasisKind::Emphasis),
            text
        );
    }
}
