//! Text diffing and snapshot history.
//!
//! Edits are described by the minimal changed region between the old and
//! new grapheme sequences. Undo works on whole-state snapshots rather than
//! inverse operations: a snapshot holds the text, the default style, a
//! shared handle to the override map, and the selection.

use std::sync::Arc;

use crate::config::DEFAULT_MAX_UNDO_DEPTH;
use crate::style::ResolvedStyle;
use crate::text::selection::Selection;
use crate::text::store::OverrideMap;

/// The region that differs between two texts, in grapheme offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextChange {
    /// First differing offset.
    pub start: usize,
    /// Graphemes of the old text replaced.
    pub removed: usize,
    /// Graphemes of the new text inserted in their place.
    pub inserted: usize,
}

impl TextChange {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }

    /// Offset just past the inserted run.
    #[must_use]
    pub const fn inserted_end(&self) -> usize {
        self.start + self.inserted
    }
}

/// Longest common prefix and suffix diff.
///
/// The suffix never overlaps the prefix, so for repeated characters the
/// change is reported at the latest possible position of the prefix.
#[must_use]
pub fn diff_graphemes(old: &[String], new: &[String]) -> TextChange {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    TextChange {
        start: prefix,
        removed: old.len() - prefix - suffix,
        inserted: new.len() - prefix - suffix,
    }
}

/// Restorable editor state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub text: String,
    pub default_style: ResolvedStyle,
    pub overrides: Arc<OverrideMap>,
    pub selection: Selection,
}

/// Linear undo/redo history over snapshots.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Undo snapshots kept; recording past it evicts from the bottom.
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_UNDO_DEPTH)
    }
}

impl History {
    /// History keeping at most `max_depth` undo snapshots.
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before a mutation. Clears the redo stack.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            let excess = self.undo_stack.len() - self.max_depth;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop the state to restore for undo, saving `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop the state to restore for redo, saving `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::segment;

    fn snap(text: &str) -> Snapshot {
        Snapshot {
            text: text.to_string(),
            default_style: ResolvedStyle::default(),
            overrides: Arc::default(),
            selection: Selection::caret(0),
        }
    }

    #[test]
    fn test_diff_insertion() {
        let change = diff_graphemes(&segment("hello world"), &segment("hello brave world"));
        assert_eq!(
            change,
            TextChange {
                start: 6,
                removed: 0,
                inserted: 6
            }
        );
    }

    #[test]
    fn test_diff_replacement_and_deletion() {
        let change = diff_graphemes(&segment("abcdef"), &segment("abXYf"));
        assert_eq!((change.start, change.removed, change.inserted), (2, 3, 2));

        let change = diff_graphemes(&segment("abc"), &segment(""));
        assert_eq!((change.start, change.removed, change.inserted), (0, 3, 0));
    }

    #[test]
    fn test_diff_repeated_chars_do_not_overlap() {
        let change = diff_graphemes(&segment("aaa"), &segment("aaaa"));
        assert_eq!((change.start, change.removed, change.inserted), (3, 0, 1));
    }

    #[test]
    fn test_diff_counts_graphemes() {
        let change = diff_graphemes(&segment("a👍🏽b"), &segment("ab"));
        assert_eq!((change.start, change.removed, change.inserted), (1, 1, 0));
    }

    #[test]
    fn test_identical_is_noop() {
        assert!(diff_graphemes(&segment("same"), &segment("same")).is_noop());
    }

    #[test]
    fn test_history_undo_redo() {
        let mut history = History::default();
        history.record(snap("a"));
        let restored = history.undo(snap("ab")).unwrap();
        assert_eq!(restored.text, "a");
        assert!(history.can_redo());
        let again = history.redo(snap("a")).unwrap();
        assert_eq!(again.text, "ab");
        assert!(history.undo(snap("ab")).is_some());
        assert!(history.undo(snap("a")).is_none());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(snap("a"));
        history.undo(snap("b"));
        history.record(snap("c"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = History::with_max_depth(2);
        for text in ["1", "2", "3"] {
            history.record(snap(text));
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(snap("4")).unwrap().text, "3");
        assert_eq!(history.undo(snap("3")).unwrap().text, "2");
        assert!(history.undo(snap("2")).is_none());
    }
}
