use crate::md::kind::ElementKind;
use crate::md::resolver::Position;
use pulldown_cmark::{Options, Parser};

/// Grammar extensions enabled for every structural parse.
///
/// Metadata blocks are on so that front matter is a single element and its
/// indented lines are never reported as indented code.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
        | Options::ENABLE_WIKILINKS
}

/// One structural element located in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub position: Position,
}

/// Every element the grammar reported for one source, in document
/// (pre-)order.
pub struct ParsedDocument {
    elements: Vec<Element>,
}

impl ParsedDocument {
    pub fn parse(source: &str) -> Self {
        let mut elements = Vec::new();

        for (event, range) in Parser::new_ext(source, markdown_options()).into_offset_iter() {
            let Some(kind) = ElementKind::from_event(&event) else {
                continue;
            };
            let byte_end = trim_line_endings(source, range.start, range.end);
            elements.push(Element {
                kind,
                position: Position::new(range.start, byte_end),
            });
        }

        Self { elements }
    }

    /// All elements in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// Block ranges include the terminator of their last line; pull the end
/// back so a position covers only the element's own text.
fn trim_line_endings(source: &str, start: usize, mut end: usize) -> usize {
    let bytes = source.as_bytes();
    while end > start && matches!(bytes[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    end
}
