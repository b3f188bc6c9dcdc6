#![forbid(unsafe_code)]

//! Source-preserving edits over the config text.
//!
//! The config is never re-serialized from a tree.  A change is a byte range
//! of the original text and its replacement, so comments, whitespace and
//! attribute order outside the edited span stay exactly as they were.

use cfgsign_core::Error;
use std::ops::Range;

/// Replace `range` of the source text with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    /// Replace the bytes in `range`.
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Insert at byte offset `at` without removing anything.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    /// Produce the edited text.
    ///
    /// Fails if the range is out of bounds or splits a UTF-8 sequence.
    pub fn apply(&self, text: &str) -> Result<String, Error> {
        let Range { start, end } = self.range;
        if start > end
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Err(Error::XmlStructure(format!(
                "edit range {start}..{end} is outside the document ({} bytes)",
                text.len()
            )));
        }

        let mut out = String::with_capacity(text.len() - (end - start) + self.replacement.len());
        out.push_str(&text[..start]);
        out.push_str(&self.replacement);
        out.push_str(&text[end..]);
        Ok(out)
    }
}
