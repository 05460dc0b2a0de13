//! Per-character style overrides.
//!
//! Overrides are keyed by linear grapheme offset. Line breaking never moves
//! a key, so a rewrap cannot strand an override; only text edits re-key
//! the map, through [`StyleStore::apply_change`]. The (line, column) view
//! used by the legacy codec is derived from the current line array.
//!
//! The map lives behind an [`Arc`] and is cloned on write, so undo
//! snapshots that capture [`StyleStore::overrides`] share it until the
//! next mutation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::style::{CharStyle, ResolvedStyle};

/// Linear offset to partial style.
pub type OverrideMap = BTreeMap<usize, Arc<CharStyle>>;

/// Element default style plus sparse per-character overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleStore {
    default: ResolvedStyle,
    overrides: Arc<OverrideMap>,
}

impl StyleStore {
    /// Create a store with no overrides.
    #[must_use]
    pub fn new(default: ResolvedStyle) -> Self {
        Self {
            default,
            overrides: Arc::default(),
        }
    }

    /// The element default style.
    #[must_use]
    pub fn default_style(&self) -> &ResolvedStyle {
        &self.default
    }

    /// Replace the element default style.
    pub fn set_default_style(&mut self, style: ResolvedStyle) {
        self.default = style;
    }

    /// Shared handle to the override map.
    #[must_use]
    pub fn overrides(&self) -> Arc<OverrideMap> {
        Arc::clone(&self.overrides)
    }

    /// Replace the override map, e.g. when restoring a snapshot.
    pub fn restore_overrides(&mut self, overrides: Arc<OverrideMap>) {
        self.overrides = overrides;
    }

    /// Number of characters carrying an override.
    #[must_use]
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// The raw override at `offset`, if any.
    #[must_use]
    pub fn override_at(&self, offset: usize) -> Option<&CharStyle> {
        self.overrides.get(&offset).map(AsRef::as_ref)
    }

    /// Iterate overrides in offset order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CharStyle)> {
        self.overrides.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Effective style of the character at `offset`.
    #[must_use]
    pub fn resolve(&self, offset: usize) -> ResolvedStyle {
        match self.overrides.get(&offset) {
            Some(patch) => self.default.overlay(patch),
            None => self.default.clone(),
        }
    }

    /// Merge `patch` onto the override of every offset in `[start, end)`,
    /// clipped to `len`. Fields absent from `patch` are preserved.
    pub fn set_range(&mut self, start: usize, end: usize, len: usize, patch: &CharStyle) {
        let (start, end) = clip(start, end, len);
        if start >= end || patch.is_empty() {
            return;
        }
        let map = Arc::make_mut(&mut self.overrides);
        for offset in start..end {
            let entry = map.entry(offset).or_default();
            Arc::make_mut(entry).merge(patch);
        }
    }

    /// Drop the overrides in `[start, end)`, clipped to `len`.
    pub fn clear_range(&mut self, start: usize, end: usize, len: usize) {
        let (start, end) = clip(start, end, len);
        if start >= end || self.overrides.range(start..end).next().is_none() {
            return;
        }
        let map = Arc::make_mut(&mut self.overrides);
        let mut tail = map.split_off(&start);
        let mut rest = tail.split_off(&end);
        map.append(&mut rest);
    }

    /// Apply `patch` to the default and to every existing override.
    ///
    /// Characters without an override pick the change up from the default,
    /// while fields `patch` does not name keep their per-character values.
    pub fn set_full(&mut self, patch: &CharStyle) {
        if patch.is_empty() {
            return;
        }
        self.default.apply(patch);
        if self.overrides.is_empty() {
            return;
        }
        for entry in Arc::make_mut(&mut self.overrides).values_mut() {
            Arc::make_mut(entry).merge(patch);
        }
    }

    /// Drop every override. The default is untouched.
    pub fn clear_full(&mut self) {
        if !self.overrides.is_empty() {
            self.overrides = Arc::default();
        }
    }

    /// Re-key overrides after `removed` characters at `start` were replaced
    /// by `inserted` new ones.
    ///
    /// Keys before `start` stay; keys inside the removed run are dropped;
    /// keys after it shift by `inserted - removed`. Inserted characters copy
    /// the override of the character before `start`, or at `start == 0` the
    /// first surviving character after the removed run.
    pub fn apply_change(&mut self, start: usize, removed: usize, inserted: usize) {
        let inherited = if start > 0 {
            self.overrides.get(&(start - 1)).cloned()
        } else {
            self.overrides.get(&(start + removed)).cloned()
        };
        self.migrate(start, removed, inserted, inherited);
    }

    /// Re-key like [`apply_change`](Self::apply_change) when the character
    /// at `start` grew into a longer grapheme, such as a letter taking a
    /// combining mark. The inserted run keeps that character's override.
    pub fn apply_extension(&mut self, start: usize, removed: usize, inserted: usize) {
        let inherited = self.overrides.get(&start).cloned();
        self.migrate(start, removed, inserted, inherited);
    }

    fn migrate(&mut self, start: usize, removed: usize, inserted: usize, inherited: Option<Arc<CharStyle>>) {
        if (removed == 0 && inserted == 0) || self.overrides.is_empty() {
            return;
        }
        let removed_end = start + removed;

        let mut migrated = OverrideMap::new();
        for (&offset, style) in self.overrides.iter() {
            if offset < start {
                migrated.insert(offset, Arc::clone(style));
            } else if offset >= removed_end {
                migrated.insert(offset - removed + inserted, Arc::clone(style));
            }
        }
        if let Some(style) = inherited {
            for offset in start..start + inserted {
                migrated.insert(offset, Arc::clone(&style));
            }
        }
        self.overrides = Arc::new(migrated);
    }

    /// Drop overrides at or beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        if self.overrides.range(len..).next().is_some() {
            Arc::make_mut(&mut self.overrides).split_off(&len);
        }
    }
}

fn clip(start: usize, end: usize, len: usize) -> (usize, usize) {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    (start.min(len), end.min(len))
}
