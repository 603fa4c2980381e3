/// Literal that opens a boxed answer.
pub const BOXED_MARKER: &str = "\\boxed";

/// Returned in place of an answer when a turn carries no marker.
pub const NOT_FOUND: &str = "no box found";

/// Outcome of scanning one turn for its final boxed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction<'a> {
    /// Trimmed suffix starting at the last marker.
    Boxed(&'a str),
    NotFound,
}

impl<'a> Extraction<'a> {
    /// The extracted suffix, or [`NOT_FOUND`].
    pub fn as_str(&self) -> &'a str {
        match self {
            Extraction::Boxed(s) => *s,
            Extraction::NotFound => NOT_FOUND,
        }
    }

    pub fn is_boxed(&self) -> bool {
        matches!(self, Extraction::Boxed(_))
    }
}

/// Locate the last `\boxed` in `text` and keep everything after it.
///
/// Nested braces are never parsed: the answer is assumed to run to the end
/// of the text, so whatever trails the final marker is kept verbatim apart
/// from surrounding whitespace.
pub fn find_boxed(text: &str) -> Extraction<'_> {
    match text.rfind(BOXED_MARKER) {
        Some(idx) => Extraction::Boxed(text[idx..].trim()),
        None => Extraction::NotFound,
    }
}

/// Same as [`find_boxed`], flattened to a string.
pub fn extract_boxed(text: &str) -> &str {
    find_boxed(text).as_str()
}
