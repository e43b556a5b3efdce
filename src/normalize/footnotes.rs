use crate::md::{resolve_positions, ElementKind};
use crate::splice::Splice;

/// Move every footnote definition to the end of the document, keeping
/// their relative order.
///
/// Each definition is cut together with up to two newlines that follow it,
/// which collapses the blank line it leaves behind. The remaining text is
/// trimmed, terminated with a single newline, and the definitions are
/// appended each on its own line, the first one after a blank line.
/// Without footnote definitions the input is returned untouched.
pub fn relocate_footnotes(text: &str) -> String {
    let positions = resolve_positions(text, ElementKind::FootnoteDefinition);
    if positions.is_empty() {
        return text.to_string();
    }

    let mut body = text.to_string();
    let mut footnotes = Vec::with_capacity(positions.len());

    for position in &positions {
        footnotes.push(text[position.range()].to_string());

        let bytes = body.as_bytes();
        let mut end = position.byte_end;
        for _ in 0..2 {
            if bytes.get(end) == Some(&b'\n') {
                end += 1;
            }
        }
        Splice::delete(position.byte_start, end).apply_in_place(&mut body);
    }
    footnotes.reverse();

    tracing::debug!(count = footnotes.len(), "relocating footnote definitions");

    let mut out = body.trim_end().to_string();
    out.push('\n');
    for footnote in &footnotes {
        out.push('\n');
        out.push_str(footnote);
    }
    out
}
