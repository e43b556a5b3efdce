//! Region protection: run prose rules without touching code, front matter
//! or links.
//!
//! Protected regions are swapped for sentinel tokens before the caller's
//! transform runs and swapped back afterwards:
//!
//! 1. code blocks and inline code (structural positions, descending splices)
//! 2. the front matter block (anchored pattern)
//! 3. link-like spans (one combined pattern, replaced in a single pass)
//!
//! Restoration runs in the opposite order (links, front matter, code), so a
//! link whose text contained inline code gets its code sentinel back before
//! the code pass puts the code in.
//!
//! Transforms must not reorder or rewrite sentinel tokens. Letter casing is
//! tolerated: sentinels are matched case-insensitively on the way back.

use crate::escape::escape_for_substitution;
use crate::front_matter::FRONT_MATTER_RE;
use crate::md::{resolve_positions_many, ElementKind};
use crate::splice::Splice;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::convert::Infallible;
use std::fmt;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Link reference definitions, wiki-links and embeds, inline links and
/// images, reference links, autolinks.
///
/// Link text may hold one nested bracket group, optionally followed by a
/// destination, so badge links (`[![alt](img.svg)](url)`) match whole.
/// Destinations allow one level of nested parentheses. Definitions never
/// start with `^`, which keeps footnote definitions out.
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xm)
          ^\x20{0,3}\[[^\[\]\n^][^\[\]\n]*\]:[\x20\t]*\S+
        | !?\[\[[^\[\]\n]+\]\]
        | !?\[(?:[^\[\]\n]|!?\[[^\[\]\n]*\](?:\([^()\n]*\))?)*\]
          \((?:[^()\n]|\([^()\n]*\))*\)
        | !?\[(?:[^\[\]\n]|!?\[[^\[\]\n]*\](?:\([^()\n]*\))?)*\]
          \[[^\[\]\n]*\]
        | <[A-Za-z][A-Za-z0-9+.\-]{1,31}:[^\s<>]*>
        ",
    )
    .unwrap()
});

/// Any sentinel of any kind; restoration keeps only exact (ASCII
/// case-insensitive) matches of its own token.
static SENTINEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i-u)mdshield(?:code|yaml|link)placeholder[0-9a-f]{16}").unwrap()
});

/// The kinds of region shielded from transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Code,
    FrontMatter,
    Link,
}

impl RegionKind {
    fn label(&self) -> &'static str {
        match self {
            RegionKind::Code => "code",
            RegionKind::FrontMatter => "yaml",
            RegionKind::Link => "link",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Placeholder token standing in for every removed region of one kind.
///
/// The token is lowercase alphanumeric so markdown rules leave it alone.
/// Its nonce is derived from the document and re-derived until the token
/// does not occur anywhere in the document, so a sentinel can never collide
/// with user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    kind: RegionKind,
    token: String,
}

impl Sentinel {
    pub fn for_text(kind: RegionKind, text: &str) -> Self {
        let haystack = text.to_ascii_lowercase();
        let mut seed = 0u64;
        let token = loop {
            let nonce = xxh3_64_with_seed(text.as_bytes(), seed);
            let candidate = format!("mdshield{}placeholder{nonce:016x}", kind.label());
            if !haystack.contains(&candidate) {
                break candidate;
            }
            seed += 1;
        };

        Self { kind, token }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn occurrences<'t>(&'t self, text: &'t str) -> impl Iterator<Item = regex::Match<'t>> + 't {
        SENTINEL_RE
            .find_iter(text)
            .filter(move |m| m.as_str().eq_ignore_ascii_case(&self.token))
    }

    /// Number of (case-insensitive) occurrences in `text`.
    pub fn count_in(&self, text: &str) -> usize {
        self.occurrences(text).count()
    }

    /// Put `originals` back, in order, each into the first sentinel
    /// occurrence still left in `text`. Originals are inserted literally.
    fn restore(&self, text: String, originals: &[String]) -> String {
        if originals.is_empty() {
            return text;
        }

        let found = self.count_in(&text);
        if found != originals.len() {
            tracing::warn!(
                region = %self.kind,
                expected = originals.len(),
                found,
                "transform changed the number of placeholders"
            );
        }

        let mut remaining = originals.iter();
        let restored = SENTINEL_RE.replace_all(&text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            if !matched.eq_ignore_ascii_case(&self.token) {
                return matched.to_string();
            }
            match remaining.next() {
                Some(original) => original.clone(),
                None => matched.to_string(),
            }
        });
        restored.into_owned()
    }
}

/// A document with its protected regions swapped out.
#[derive(Debug, Clone)]
pub struct MaskedDocument {
    sanitized: String,
    code: Sentinel,
    code_blocks: Vec<String>,
    yaml: Sentinel,
    front_matter: Option<String>,
    link: Sentinel,
    links: Vec<String>,
}

impl MaskedDocument {
    /// Swap out code, then front matter, then links.
    pub fn mask(text: &str) -> Self {
        let code = Sentinel::for_text(RegionKind::Code, text);
        let yaml = Sentinel::for_text(RegionKind::FrontMatter, text);
        let link = Sentinel::for_text(RegionKind::Link, text);

        let mut sanitized = text.to_string();

        // Positions arrive highest offset first; collect in that order and
        // flip once so the list reads left to right.
        let mut code_blocks = Vec::new();
        for position in
            resolve_positions_many(text, &[ElementKind::CodeBlock, ElementKind::InlineCode])
        {
            code_blocks.push(text[position.range()].to_string());
            Splice::at(position, code.token()).apply_in_place(&mut sanitized);
        }
        code_blocks.reverse();

        let front_matter = FRONT_MATTER_RE.captures(&sanitized).and_then(|caps| {
            let tail = caps.name("tail")?;
            Some(sanitized[..tail.start()].to_string())
        });
        if front_matter.is_some() {
            let replacement = format!("{}${{tail}}", escape_for_substitution(yaml.token()));
            sanitized = FRONT_MATTER_RE
                .replacen(&sanitized, 1, replacement.as_str())
                .into_owned();
        }

        let links: Vec<String> = LINK_RE
            .find_iter(&sanitized)
            .map(|m| m.as_str().to_string())
            .collect();
        if !links.is_empty() {
            sanitized = LINK_RE
                .replace_all(&sanitized, escape_for_substitution(link.token()).as_str())
                .into_owned();
        }

        tracing::debug!(
            code = code_blocks.len(),
            front_matter = front_matter.is_some(),
            links = links.len(),
            "masked protected regions"
        );

        Self {
            sanitized,
            code,
            code_blocks,
            yaml,
            front_matter,
            link,
            links,
        }
    }

    /// The text a transform gets to see.
    pub fn sanitized(&self) -> &str {
        &self.sanitized
    }

    pub fn sentinel(&self, kind: RegionKind) -> &Sentinel {
        match kind {
            RegionKind::Code => &self.code,
            RegionKind::FrontMatter => &self.yaml,
            RegionKind::Link => &self.link,
        }
    }

    /// Original contents of the removed regions of `kind`, left to right.
    pub fn regions(&self, kind: RegionKind) -> &[String] {
        match kind {
            RegionKind::Code => &self.code_blocks,
            RegionKind::FrontMatter => self.front_matter.as_slice(),
            RegionKind::Link => &self.links,
        }
    }

    /// Undo the masking on `transformed`: links, then front matter, then
    /// code.
    pub fn restore(&self, transformed: String) -> String {
        let text = self.link.restore(transformed, &self.links);
        let text = self.yaml.restore(text, self.front_matter.as_slice());
        self.code.restore(text, &self.code_blocks)
    }
}

/// Run `transform` over `text` with code, front matter and links shielded.
pub fn protect<F>(text: &str, transform: F) -> String
where
    F: FnOnce(&str) -> String,
{
    match try_protect(text, |sanitized| Ok::<_, Infallible>(transform(sanitized))) {
        Ok(restored) => restored,
        Err(never) => match never {},
    }
}

/// Fallible [`protect`]; an error from `transform` propagates unchanged.
pub fn try_protect<F, E>(text: &str, transform: F) -> Result<String, E>
where
    F: FnOnce(&str) -> Result<String, E>,
{
    let masked = MaskedDocument::mask(text);
    let transformed = transform(masked.sanitized())?;
    Ok(masked.restore(transformed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{unify_delimiters, DelimiterStyle, EmphasisKind};

    const DOC: &str = "---\ntitle: $1 draft\n---\n\nSome *prose* with `inline *code*` and a [link](https://example.com/a_b_c).\n\n```rust\nlet total = \"$1\";\n```\n\nSee ![img](pic.png), [[Wiki Page]] and <https://rust-lang.org>.\n";

    #[test]
    fn identity_round_trip() {
        assert_eq!(protect(DOC, |t| t.to_string()), DOC);
    }

    #[test]
    fn sanitized_text_hides_regions() {
        let masked = MaskedDocument::mask(DOC);
        let sanitized = masked.sanitized();
        assert!(!sanitized.contains("inline *code*"));
        assert!(!sanitized.contains("let total"));
        assert!(!sanitized.contains("title:"));
        assert!(!sanitized.contains("example.com"));
        assert!(!sanitized.contains("Wiki Page"));
        assert!(!sanitized.contains("rust-lang.org"));
        assert!(sanitized.contains("Some *prose* with"));

        assert_eq!(
            masked.regions(RegionKind::Code),
            &["`inline *code*`".to_string(), "```rust\nlet total = \"$1\";\n```".to_string()]
        );
        assert_eq!(
            masked.regions(RegionKind::FrontMatter),
            &["---\ntitle: $1 draft\n---".to_string()]
        );
        assert_eq!(masked.regions(RegionKind::Link).len(), 4);
        assert_eq!(masked.sentinel(RegionKind::Link).count_in(sanitized), 4);
    }

    #[test]
    fn transform_only_touches_prose() {
        let out = protect(DOC, |t| t.replace('*', "_"));
        assert!(out.contains("Some _prose_ with"));
        assert!(out.contains("`inline *code*`"));
        assert!(out.contains("[link](https://example.com/a_b_c)"));
        assert!(out.contains("---\ntitle: $1 draft\n---"));
        assert!(out.contains("let total = \"$1\";"));
    }

    #[test]
    fn restore_survives_case_changes() {
        let text = "intro `code` and [x](y) end";
        let out = protect(text, |t| t.to_uppercase());
        assert_eq!(out, "INTRO `code` AND [x](y) END");
    }

    #[test]
    fn code_inside_link_text_restores() {
        let text = "see [`cfg`](docs.md) now";
        let masked = MaskedDocument::mask(text);
        assert_eq!(masked.regions(RegionKind::Code), &["`cfg`".to_string()]);
        assert_eq!(masked.regions(RegionKind::Link).len(), 1);
        assert_eq!(masked.restore(masked.sanitized().to_string()), text);
    }

    #[test]
    fn no_regions_is_plain_transform() {
        let out = protect("just words", |t| t.replace("words", "prose"));
        assert_eq!(out, "just prose");
    }

    #[test]
    fn sentinel_avoids_existing_text() {
        let first = Sentinel::for_text(RegionKind::Code, "plain");
        let tricky = format!("contains {} verbatim", first.token().to_uppercase());
        let second = Sentinel::for_text(RegionKind::Code, &tricky);
        assert!(!tricky.to_lowercase().contains(second.token()));
    }

    #[test]
    fn try_protect_propagates_errors() {
        let result: Result<String, &str> = try_protect("`x` text", |_| Err("rule failed"));
        assert_eq!(result, Err("rule failed"));
    }

    #[test]
    fn lost_placeholder_drops_region() {
        let text = "a `one` b `two`";
        let out = protect(text, |t| {
            let masked = MaskedDocument::mask(text);
            let token = masked.sentinel(RegionKind::Code).token().to_string();
            t.replacen(&token, "", 1)
        });
        assert_eq!(out, "a  b `one`");
    }

    #[test]
    fn link_text_with_nested_image_is_one_region() {
        let text = "[**Docs** ![logo](logo.png)](https://example.com/docs) and **x**\n";
        let masked = MaskedDocument::mask(text);
        assert_eq!(
            masked.regions(RegionKind::Link),
            &["[**Docs** ![logo](logo.png)](https://example.com/docs)".to_string()]
        );

        let out = protect(text, |prose| {
            unify_delimiters(prose, DelimiterStyle::Underscore, EmphasisKind::Strong)
        });
        assert_eq!(
            out,
            "[**Docs** ![logo](logo.png)](https://example.com/docs) and __x__\n"
        );
    }

    #[test]
    fn badge_link_destination_untouched() {
        let text = "[![build](ci.svg)](https://ci.example/a*b*c)\n";
        assert_eq!(protect(text, |t| t.replace('*', "_")), text);
    }

    #[test]
    fn reference_definitions_are_links() {
        let text = "Read [the docs][docs] for *more*.\n\n[docs]: https://x.example/a*b*\n";
        let masked = MaskedDocument::mask(text);
        assert_eq!(
            masked.regions(RegionKind::Link),
            &[
                "[the docs][docs]".to_string(),
                "[docs]: https://x.example/a*b*".to_string()
            ]
        );
        assert_eq!(
            protect(text, |t| t.replace('*', "_")),
            "Read [the docs][docs] for _more_.\n\n[docs]: https://x.example/a*b*\n"
        );
    }

    #[test]
    fn footnote_definitions_are_not_links() {
        let masked = MaskedDocument::mask("A[^1]\n\n[^1]: note\n");
        assert!(masked.regions(RegionKind::Link).is_empty());
    }

    #[test]
    fn foreign_sentinel_text_is_left_alone() {
        let foreign = "mdshieldcodeplaceholder0123456789abcdef";
        let text = format!("{foreign} then `x`");
        let masked = MaskedDocument::mask(&text);
        assert_ne!(masked.sentinel(RegionKind::Code).token(), foreign);
        assert_eq!(masked.sentinel(RegionKind::Code).count_in(masked.sanitized()), 1);
        assert_eq!(
            protect(&text, |t| t.to_uppercase()),
            format!("{} THEN `x`", foreign.to_uppercase())
        );
    }

    #[test]
    fn restored_content_is_literal() {
        let text = "a `$1 ${0} $$` b\n";
        assert_eq!(protect(text, |t| t.to_string()), text);
    }
}
