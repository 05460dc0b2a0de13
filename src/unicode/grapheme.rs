//! Grapheme cluster segmentation.
//!
//! Every offset in this crate counts user-perceived characters. A family
//! emoji, a flag, or `e` followed by a combining accent is one unit, and so
//! is a `"\r\n"` pair.

use unicode_segmentation::UnicodeSegmentation;

/// Zero-width space, treated as a word boundary for wrapping and selection.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Iterator over grapheme clusters in a string.
pub struct GraphemeIterator<'a> {
    inner: unicode_segmentation::Graphemes<'a>,
}

impl<'a> Iterator for GraphemeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterate over grapheme clusters in a string.
#[must_use]
pub fn graphemes(s: &str) -> GraphemeIterator<'_> {
    GraphemeIterator {
        inner: s.graphemes(true),
    }
}

/// Split a string into owned grapheme clusters.
///
/// Joining the result reproduces `s` exactly. Call sites index into the
/// result randomly, so this is eager rather than lazy.
#[must_use]
pub fn segment(s: &str) -> Vec<String> {
    graphemes(s).map(str::to_owned).collect()
}

/// Whether the grapheme is a hard line break (`\n`, `\r\n`, or `\r`).
#[must_use]
pub fn is_newline(g: &str) -> bool {
    matches!(g, "\n" | "\r\n" | "\r")
}

/// Whether the grapheme separates words: whitespace or a zero-width space.
#[must_use]
pub fn is_word_boundary(g: &str) -> bool {
    g.chars()
        .next()
        .is_some_and(|c| c.is_whitespace() || c == ZERO_WIDTH_SPACE)
}
