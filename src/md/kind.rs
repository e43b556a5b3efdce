use pulldown_cmark::{Event, Tag};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Structural element kinds the markdown grammar recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// `` `code` ``
    InlineCode,
    /// Fenced or indented code block
    CodeBlock,
    /// `[^label]: text`
    FootnoteDefinition,
    /// `[^label]`
    FootnoteReference,
    Emphasis,
    Strong,
    Strikethrough,
    /// Inline, reference, autolink or wiki-link
    Link,
    Image,
    Heading,
    BlockQuote,
    List,
    Table,
    /// HTML block or inline HTML
    Html,
    /// YAML metadata block at the top of the document
    FrontMatter,
}

impl ElementKind {
    pub const ALL: [ElementKind; 15] = [
        ElementKind::InlineCode,
        ElementKind::CodeBlock,
        ElementKind::FootnoteDefinition,
        ElementKind::FootnoteReference,
        ElementKind::Emphasis,
        ElementKind::Strong,
        ElementKind::Strikethrough,
        ElementKind::Link,
        ElementKind::Image,
        ElementKind::Heading,
        ElementKind::BlockQuote,
        ElementKind::List,
        ElementKind::Table,
        ElementKind::Html,
        ElementKind::FrontMatter,
    ];

    /// Classify a parser event that opens (or is) an element.
    ///
    /// Only `Start` events and self-contained leaf events map to a kind;
    /// the offset iterator already reports the full element range for them.
    pub fn from_event(event: &Event<'_>) -> Option<Self> {
        match event {
            Event::Code(_) => Some(ElementKind::InlineCode),
            Event::FootnoteReference(_) => Some(ElementKind::FootnoteReference),
            Event::InlineHtml(_) => Some(ElementKind::Html),
            Event::Start(tag) => match tag {
                Tag::CodeBlock(_) => Some(ElementKind::CodeBlock),
                Tag::FootnoteDefinition(_) => Some(ElementKind::FootnoteDefinition),
                Tag::Emphasis => Some(ElementKind::Emphasis),
                Tag::Strong => Some(ElementKind::Strong),
                Tag::Strikethrough => Some(ElementKind::Strikethrough),
                Tag::Link { .. } => Some(ElementKind::Link),
                Tag::Image { .. } => Some(ElementKind::Image),
                Tag::Heading { .. } => Some(ElementKind::Heading),
                Tag::BlockQuote(_) => Some(ElementKind::BlockQuote),
                Tag::List(_) => Some(ElementKind::List),
                Tag::Table(_) => Some(ElementKind::Table),
                Tag::HtmlBlock => Some(ElementKind::Html),
                Tag::MetadataBlock(_) => Some(ElementKind::FrontMatter),
                _ => None,
            },
            _ => None,
        }
    }

    /// mdast-style node name.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::InlineCode => "inlineCode",
            ElementKind::CodeBlock => "code",
            ElementKind::FootnoteDefinition => "footnoteDefinition",
            ElementKind::FootnoteReference => "footnoteReference",
            ElementKind::Emphasis => "emphasis",
            ElementKind::Strong => "strong",
            ElementKind::Strikethrough => "delete",
            ElementKind::Link => "link",
            ElementKind::Image => "image",
            ElementKind::Heading => "heading",
            ElementKind::BlockQuote => "blockquote",
            ElementKind::List => "list",
            ElementKind::Table => "table",
            ElementKind::Html => "html",
            ElementKind::FrontMatter => "yaml",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown element kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    /// Accepts mdast names (`inlineCode`, `footnoteDefinition`) and
    /// snake_case aliases (`inline_code`, `footnote_definition`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "inlineCode" | "inline_code" => ElementKind::InlineCode,
            "code" | "code_block" => ElementKind::CodeBlock,
            "footnoteDefinition" | "footnote_definition" => ElementKind::FootnoteDefinition,
            "footnoteReference" | "footnote_reference" => ElementKind::FootnoteReference,
            "emphasis" => ElementKind::Emphasis,
            "strong" => ElementKind::Strong,
            "delete" | "strikethrough" => ElementKind::Strikethrough,
            "link" => ElementKind::Link,
            "image" => ElementKind::Image,
            "heading" => ElementKind::Heading,
            "blockquote" | "block_quote" => ElementKind::BlockQuote,
            "list" => ElementKind::List,
            "table" => ElementKind::Table,
            "html" => ElementKind::Html,
            "yaml" | "front_matter" => ElementKind::FrontMatter,
            other => return Err(UnknownKind(other.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(kind.name().parse::<ElementKind>(), Ok(kind));
        }
    }

    #[test]
    fn snake_case_aliases() {
        assert_eq!("inline_code".parse::<ElementKind>(), Ok(ElementKind::InlineCode));
        assert_eq!(
            "footnote_definition".parse::<ElementKind>(),
            Ok(ElementKind::FootnoteDefinition)
        );
        assert_eq!("code_block".parse::<ElementKind>(), Ok(ElementKind::CodeBlock));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            "paragraphz".parse::<ElementKind>(),
            Err(UnknownKind("paragraphz".to_string()))
        );
    }
}
