use crate::md::Position;

/// The fundamental text-surgery primitive: byte-span replacement.
///
/// Every pass that rewrites part of a document compiles down to splices.
/// Offsets refer to the string the positions were resolved against, so a
/// batch must be applied highest offset first: each splice only shifts
/// bytes to its right, which have already been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Splice does nothing until applied"]
pub struct Splice {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
}

impl Splice {
    pub fn new(byte_start: usize, byte_end: usize, new_text: impl Into<String>) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
        }
    }

    /// Replace the span covered by `position`.
    pub fn at(position: Position, new_text: impl Into<String>) -> Self {
        Self::new(position.byte_start, position.byte_end, new_text)
    }

    /// Remove the span without inserting anything.
    pub fn delete(byte_start: usize, byte_end: usize) -> Self {
        Self::new(byte_start, byte_end, String::new())
    }

    /// Apply this splice to `text` in place.
    pub fn apply_in_place(&self, text: &mut String) {
        text.replace_range(self.byte_start..self.byte_end, &self.new_text);
    }
}

/// Return `text[..start] + replacement + text[end..]`.
///
/// Offsets are trusted: they come from a resolver run against `text`.
pub fn splice(text: &str, position: Position, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len() - position.len());
    out.push_str(&text[..position.byte_start]);
    out.push_str(replacement);
    out.push_str(&text[position.byte_end..]);
    out
}

/// Apply a batch of non-overlapping splices to one owned string.
///
/// Splices are sorted by byte_start descending and applied bottom-to-top
/// to avoid offset invalidation.
pub fn apply_descending(text: impl Into<String>, mut splices: Vec<Splice>) -> String {
    let mut text = text.into();
    if splices.is_empty() {
        return text;
    }

    splices.sort_by(|a, b| b.byte_start.cmp(&a.byte_start).then(b.byte_end.cmp(&a.byte_end)));

    // Non-overlapping regions: earlier splice's end <= later splice's start
    debug_assert!(
        splices.windows(2).all(|w| w[1].byte_end <= w[0].byte_start),
        "overlapping splices"
    );

    for splice in &splices {
        splice.apply_in_place(&mut text);
    }

    text
}
