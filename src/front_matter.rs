//! YAML front matter: locate, transform, ensure, decode and encode.
//!
//! A front matter block is the leading `---` ... `---` region and must start
//! at byte 0. Block strings handed out here include both delimiter lines
//! but not the newline after the closing one.

use crate::error::{Error, Result};
use crate::escape::escape_for_substitution;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::convert::Infallible;

/// Anchored front matter pattern. `tail` is the closing delimiter's line
/// terminator (or end of input) and is never part of the block.
pub(crate) static FRONT_MATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(?P<body>.*?\r?\n)?---(?P<tail>\r?\n|\z)").unwrap()
});

static LEADING_TABS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\t+").unwrap());

/// Empty front matter inserted by [`ensure_front_matter`].
pub const EMPTY_FRONT_MATTER: &str = "---\n---\n";

/// The leading front matter block, if `text` has one.
pub fn front_matter_block(text: &str) -> Option<&str> {
    let caps = FRONT_MATTER_RE.captures(text)?;
    let tail = caps.name("tail")?;
    Some(&text[..tail.start()])
}

/// The YAML between the delimiters of a block returned by
/// [`front_matter_block`]. Empty for `---\n---`.
pub fn front_matter_body(block: &str) -> &str {
    FRONT_MATTER_RE
        .captures(block)
        .and_then(|caps| caps.name("body"))
        .map_or("", |body| body.as_str())
}

/// Run `transform` over the front matter block and substitute the result
/// back. No-op when the document has no front matter.
pub fn format_front_matter<F>(text: &str, transform: F) -> String
where
    F: FnOnce(&str) -> String,
{
    match try_format_front_matter(text, |block| Ok::<_, Infallible>(transform(block))) {
        Ok(formatted) => formatted,
        Err(never) => match never {},
    }
}

/// Fallible [`format_front_matter`]; errors from `transform` propagate.
pub fn try_format_front_matter<F, E>(text: &str, transform: F) -> std::result::Result<String, E>
where
    F: FnOnce(&str) -> std::result::Result<String, E>,
{
    let Some(block) = front_matter_block(text) else {
        return Ok(text.to_string());
    };

    let formatted = transform(block)?;
    let replacement = format!("{}${{tail}}", escape_for_substitution(&formatted));
    Ok(FRONT_MATTER_RE
        .replacen(text, 1, replacement.as_str())
        .into_owned())
}

/// Prepend an empty front matter block unless one is already present.
pub fn ensure_front_matter(text: &str) -> String {
    if FRONT_MATTER_RE.is_match(text) {
        text.to_string()
    } else {
        format!("{EMPTY_FRONT_MATTER}{text}")
    }
}

/// Decode front matter YAML (the body, without delimiters) into a mapping.
///
/// Lines indented with tabs are re-indented with two spaces per tab before
/// decoding: tabs are not valid YAML indentation but show up constantly in
/// hand-edited front matter. Empty or null documents decode to an empty
/// mapping.
pub fn parse_front_matter(yaml: &str) -> Result<Mapping> {
    let normalized = LEADING_TABS_RE.replace_all(yaml, |caps: &regex::Captures<'_>| {
        "  ".repeat(caps[0].len())
    });

    if normalized.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(&normalized)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(Error::FrontMatterNotMapping {
            found: value_kind(&other),
        }),
    }
}

/// Encode a mapping as a complete front matter block (delimiters included,
/// no trailing newline). serde_yaml never folds long scalars.
pub fn render_front_matter(mapping: &Mapping) -> Result<String> {
    if mapping.is_empty() {
        return Ok("---\n---".to_string());
    }
    let body = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{body}---"))
}

/// Decode and re-encode the front matter block, normalizing indentation
/// and quoting. No-op without front matter; malformed YAML is an error.
pub fn normalize_front_matter(text: &str) -> Result<String> {
    try_format_front_matter(text, |block| {
        let mapping = parse_front_matter(front_matter_body(block))?;
        render_front_matter(&mapping)
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
