//! Selection state and word boundaries.

use std::ops::Range;

use crate::unicode::{is_newline, is_word_boundary};

/// Ordered selection with a remembered anchor.
///
/// `start <= end` always holds; `start == end` is a caret. Extending moves
/// the end opposite the anchor, whichever direction it goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    anchor: usize,
}

impl Selection {
    /// A caret at `offset`.
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            anchor: offset,
        }
    }

    /// A range anchored at its lower end. Inverted input is reordered.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        let (start, end) = (start.min(end), start.max(end));
        Self {
            start,
            end,
            anchor: start,
        }
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub const fn anchor(&self) -> usize {
        self.anchor
    }

    /// The moving end.
    #[must_use]
    pub const fn focus(&self) -> usize {
        if self.anchor == self.start {
            self.end
        } else {
            self.start
        }
    }

    /// Collapse to `offset`, or stretch from the anchor to it.
    pub fn update(&mut self, offset: usize, extend: bool) {
        if extend {
            self.start = self.anchor.min(offset);
            self.end = self.anchor.max(offset);
        } else {
            *self = Self::caret(offset);
        }
    }

    /// Clamp every end into `[0, len]`.
    pub fn clamp(&mut self, len: usize) {
        self.start = self.start.min(len);
        self.end = self.end.min(len);
        self.anchor = self.anchor.min(len);
    }
}

fn is_word_char(g: &str) -> bool {
    !is_word_boundary(g)
}

/// End of the word at or after `offset`.
#[must_use]
pub fn next_word_boundary(graphemes: &[String], offset: usize) -> usize {
    let mut in_word = false;
    for (idx, g) in graphemes.iter().enumerate().skip(offset) {
        let word = is_word_char(g);
        if in_word && !word {
            return idx;
        }
        in_word |= word;
    }
    graphemes.len()
}

/// Start of the word at or before `offset`.
#[must_use]
pub fn prev_word_boundary(graphemes: &[String], offset: usize) -> usize {
    let mut idx = offset.min(graphemes.len());
    while idx > 0 && !is_word_char(&graphemes[idx - 1]) {
        idx -= 1;
    }
    while idx > 0 && is_word_char(&graphemes[idx - 1]) {
        idx -= 1;
    }
    idx
}

/// Maximal run containing `offset` of graphemes sharing its class.
///
/// A caret just past a word selects that word. Newlines never join a run.
#[must_use]
pub fn word_range_at(graphemes: &[String], offset: usize) -> Range<usize> {
    let offset = offset.min(graphemes.len());
    let probe = match graphemes.get(offset) {
        Some(g) if is_word_char(g) => offset,
        _ if offset > 0 && is_word_char(&graphemes[offset - 1]) => offset - 1,
        Some(g) if !is_newline(g) => offset,
        _ => return offset..offset,
    };
    let class = is_word_char(&graphemes[probe]);
    let same = |g: &String| is_word_char(g) == class && !is_newline(g);

    let mut start = probe;
    while start > 0 && same(&graphemes[start - 1]) {
        start -= 1;
    }
    let mut end = probe + 1;
    while end < graphemes.len() && same(&graphemes[end]) {
        end += 1;
    }
    start..end
}
