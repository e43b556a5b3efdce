use crate::md::kind::ElementKind;
use crate::md::parser::ParsedDocument;
use serde::Serialize;
use std::ops::Range;

/// Half-open byte range `[byte_start, byte_end)` into the string the
/// resolver ran against.
///
/// Positions go stale as soon as that string is spliced; consume them in
/// the pass that produced them, highest offset first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub byte_start: usize,
    pub byte_end: usize,
}

impl Position {
    pub fn new(byte_start: usize, byte_end: usize) -> Self {
        Self {
            byte_start,
            byte_end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.byte_start..self.byte_end
    }

    pub fn len(&self) -> usize {
        self.byte_end - self.byte_start
    }

    pub fn is_empty(&self) -> bool {
        self.byte_start == self.byte_end
    }
}

impl From<Range<usize>> for Position {
    fn from(range: Range<usize>) -> Self {
        Position::new(range.start, range.end)
    }
}

/// Every occurrence of `kind` in `text`, sorted by descending start offset.
///
/// Consumers splice in this order so that each edit only moves bytes that
/// were already visited. When two elements share a start, the inner
/// (shorter) one comes first.
pub fn resolve_positions(text: &str, kind: ElementKind) -> Vec<Position> {
    resolve_positions_many(text, &[kind])
}

/// Like [`resolve_positions`], merging several kinds from a single parse.
pub fn resolve_positions_many(text: &str, kinds: &[ElementKind]) -> Vec<Position> {
    if text.is_empty() || kinds.is_empty() {
        return Vec::new();
    }

    let parsed = ParsedDocument::parse(text);
    let mut positions: Vec<Position> = parsed
        .elements()
        .iter()
        .filter(|element| kinds.contains(&element.kind))
        .map(|element| element.position)
        .collect();

    sort_descending(&mut positions);
    positions
}

/// Resolve by node name (`"footnoteDefinition"`, `"inline_code"`, ...).
///
/// Names the grammar does not recognize yield no positions.
pub fn resolve_named(text: &str, name: &str) -> Vec<Position> {
    match name.parse::<ElementKind>() {
        Ok(kind) => resolve_positions(text, kind),
        Err(_) => Vec::new(),
    }
}

fn sort_descending(positions: &mut [Position]) {
    positions.sort_by(|a, b| {
        b.byte_start
            .cmp(&a.byte_start)
            .then(a.byte_end.cmp(&b.byte_end))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(text: &'a str, positions: &[Position]) -> Vec<&'a str> {
        positions.iter().map(|p| &text[p.range()]).collect()
    }

    #[test]
    fn emphasis_positions_descending() {
        let text = "*a* and _b_ and *c*";
        let positions = resolve_positions(text, ElementKind::Emphasis);
        assert_eq!(texts(text, &positions), vec!["*c*", "_b_", "*a*"]);
        assert!(positions
            .windows(2)
            .all(|w| w[0].byte_start > w[1].byte_start));
    }

    #[test]
    fn strong_is_distinct_from_emphasis() {
        let text = "**bold** and *em*";
        assert_eq!(
            texts(text, &resolve_positions(text, ElementKind::Strong)),
            vec!["**bold**"]
        );
        assert_eq!(
            texts(text, &resolve_positions(text, ElementKind::Emphasis)),
            vec!["*em*"]
        );
    }

    #[test]
    fn footnote_definition_excludes_newline() {
        let text = "A[^1]\n\n[^1]: one\n\nB\n";
        let positions = resolve_positions(text, ElementKind::FootnoteDefinition);
        assert_eq!(texts(text, &positions), vec!["[^1]: one"]);
    }

    #[test]
    fn code_kinds_merge() {
        let text = "Use `x`.\n\n```\nfn main() {}\n```\n\nand `y`\n";
        let positions =
            resolve_positions_many(text, &[ElementKind::InlineCode, ElementKind::CodeBlock]);
        assert_eq!(
            texts(text, &positions),
            vec!["`y`", "```\nfn main() {}\n```", "`x`"]
        );
    }

    #[test]
    fn emphasis_inside_code_is_not_emphasis() {
        let text = "`*not em*` but *em*";
        let positions = resolve_positions(text, ElementKind::Emphasis);
        assert_eq!(texts(text, &positions), vec!["*em*"]);
    }

    #[test]
    fn unknown_name_yields_nothing() {
        assert!(resolve_named("*a*", "sparkle").is_empty());
        assert_eq!(resolve_named("*a*", "emphasis"), vec![Position::new(0, 3)]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(resolve_positions("", ElementKind::Emphasis).is_empty());
    }

    #[test]
    fn nested_same_start_inner_first() {
        let mut positions = vec![Position::new(0, 10), Position::new(0, 4), Position::new(5, 6)];
        sort_descending(&mut positions);
        assert_eq!(
            positions,
            vec![Position::new(5, 6), Position::new(0, 4), Position::new(0, 10)]
        );
    }
}
