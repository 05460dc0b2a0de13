//! Style ranges: the compact wire form of per-character overrides.
//!
//! A document stores overrides as `{start, end, ...styleFields}` records.
//! Export walks the overrides in offset order and merges neighbours whose
//! records are equal, so ranges come out sorted, disjoint and maximal.
//! Characters without an override produce no range.
//!
//! An older nested `{line: {column: style}}` form is also read and written.
//! It is loaded as-is against the current line array; malformed entries
//! are skipped with a warning.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::style::CharStyle;
use crate::text::coords::{self, Location};
use crate::text::store::StyleStore;
use crate::text::wrap::Line;

/// Overrides shared by the characters in `[start, end)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleRange {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub style: CharStyle,
}

impl StyleRange {
    #[must_use]
    pub fn new(range: Range<usize>, style: CharStyle) -> Self {
        Self {
            start: range.start,
            end: range.end,
            style,
        }
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this range overlaps with another.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Nested line -> column -> style map.
pub type LegacyStyles = BTreeMap<usize, BTreeMap<usize, CharStyle>>;

/// Compress the store's overrides into maximal ranges.
#[must_use]
pub fn export_ranges(store: &StyleStore) -> Vec<StyleRange> {
    let mut ranges: Vec<StyleRange> = Vec::new();
    for (offset, style) in store.iter() {
        match ranges.last_mut() {
            Some(current) if current.end == offset && current.style == *style => {
                current.end += 1;
            }
            _ => ranges.push(StyleRange::new(offset..offset + 1, style.clone())),
        }
    }
    ranges
}

/// Merge every range onto the store, clipped to `len`. Returns how many
/// ranges touched at least one character.
pub fn import_ranges(store: &mut StyleStore, ranges: &[StyleRange], len: usize) -> usize {
    let mut applied = 0;
    for range in ranges {
        if range.start.min(len) >= range.end.min(len) {
            continue;
        }
        store.set_range(range.start, range.end, len, &range.style);
        applied += 1;
    }
    applied
}

/// Project the overrides onto (line, column) keys. Overrides on newline
/// characters have no column and are left out.
#[must_use]
pub fn export_legacy(store: &StyleStore, lines: &[Line]) -> LegacyStyles {
    let mut legacy = LegacyStyles::new();
    for (offset, style) in store.iter() {
        let loc = coords::linear_to_location(lines, offset);
        let on_char = lines.get(loc.line).is_some_and(|l| loc.column < l.len);
        if on_char {
            legacy
                .entry(loc.line)
                .or_default()
                .insert(loc.column, style.clone());
        }
    }
    legacy
}

/// Load a nested `{line: {column: style}}` object against `lines`.
///
/// Returns the number of characters styled. Entries with non-numeric keys,
/// positions outside the current lines, or undecodable styles are skipped.
pub fn import_legacy(store: &mut StyleStore, value: &Value, lines: &[Line]) -> usize {
    let Some(by_line) = value.as_object() else {
        warn!(kind = value_kind(value), "legacy styles are not an object; ignored");
        return 0;
    };
    let len = coords::text_len(lines);

    let mut loaded = 0;
    for (line_key, columns) in by_line {
        let Ok(line_index) = line_key.parse::<usize>() else {
            warn!(key = %line_key, "skipping legacy style line with non-numeric key");
            continue;
        };
        let Some(line) = lines.get(line_index) else {
            warn!(line = line_index, "skipping legacy styles for missing line");
            continue;
        };
        let Some(columns) = columns.as_object() else {
            warn!(line = line_index, "skipping legacy style line that is not an object");
            continue;
        };
        for (column_key, raw) in columns {
            let Ok(column) = column_key.parse::<usize>() else {
                warn!(line = line_index, key = %column_key, "skipping non-numeric legacy column");
                continue;
            };
            if column >= line.len {
                warn!(line = line_index, column, "skipping legacy style past line end");
                continue;
            }
            let style = match CharStyle::deserialize(raw) {
                Ok(style) if !style.is_empty() => style,
                Ok(_) => {
                    warn!(line = line_index, column, "skipping legacy style with no usable fields");
                    continue;
                }
                Err(err) => {
                    warn!(line = line_index, column, error = %err, "skipping undecodable legacy style");
                    continue;
                }
            };
            let offset = coords::location_to_linear(lines, Location::new(line_index, column));
            store.set_range(offset, offset + 1, len, &style);
            loaded += 1;
        }
    }
    loaded
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::style::FontWeight;
    use serde_json::json;

    fn bold() -> CharStyle {
        CharStyle::new().with_font_weight(FontWeight::BOLD)
    }

    fn lines_for(text: &str) -> Vec<Line> {
        crate::text::RichTextBuffer::with_text(text).lines().to_vec()
    }

    #[test]
    fn test_export_merges_equal_neighbours() {
        let mut store = StyleStore::default();
        store.set_range(0, 3, 10, &bold());
        store.set_range(3, 5, 10, &bold());
        store.set_range(7, 8, 10, &bold());
        store.set_range(8, 9, 10, &CharStyle::new().with_fill(Rgba::RED));

        let ranges = export_ranges(&store);
        let spans: Vec<Range<usize>> = ranges.iter().map(StyleRange::range).collect();
        assert_eq!(spans, vec![0..5, 7..8, 8..9]);
        assert!(!ranges[0].overlaps(&ranges[1]));
    }

    #[test]
    fn test_wire_shape() {
        let range = StyleRange::new(0..3, bold());
        insta::assert_snapshot!(
            serde_json::to_string(&range).unwrap(),
            @r#"{"start":0,"end":3,"fontWeight":"bold"}"#
        );
        let back: StyleRange =
            serde_json::from_value(json!({"start": 1, "end": 2, "fill": "#ff0000"})).unwrap();
        assert_eq!(back.style.fill, Some(Rgba::RED.into()));
    }

    #[test]
    fn test_import_clips_and_merges() {
        let mut store = StyleStore::default();
        store.set_range(0, 2, 4, &CharStyle::new().with_fill(Rgba::RED));
        let applied = import_ranges(
            &mut store,
            &[StyleRange::new(1..9, bold()), StyleRange::new(6..8, bold())],
            4,
        );
        assert_eq!(applied, 1);
        assert_eq!(store.override_count(), 4);
        let second = store.resolve(1);
        assert_eq!(second.fill_color(), Rgba::RED);
        assert!(second.font_weight.is_bold());
    }

    #[test]
    fn test_round_trip_resolves_equally() {
        let mut store = StyleStore::default();
        store.set_range(0, 4, 8, &bold());
        store.set_range(2, 6, 8, &CharStyle::new().with_italic(true));

        let mut rebuilt = StyleStore::default();
        import_ranges(&mut rebuilt, &export_ranges(&store), 8);
        for offset in 0..8 {
            assert_eq!(rebuilt.resolve(offset), store.resolve(offset));
        }
    }

    #[test]
    fn test_legacy_round_trip() {
        let lines = lines_for("ab\ncd");
        let mut store = StyleStore::default();
        store.set_range(1, 5, 5, &bold());

        let legacy = export_legacy(&store, &lines);
        // The newline at offset 2 has no column.
        assert_eq!(legacy[&0].keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(legacy[&1].keys().copied().collect::<Vec<_>>(), vec![0, 1]);

        let value = serde_json::to_value(&legacy).unwrap();
        let mut rebuilt = StyleStore::default();
        assert_eq!(import_legacy(&mut rebuilt, &value, &lines), 3);
        assert!(rebuilt.resolve(4).font_weight.is_bold());
        assert!(!rebuilt.resolve(0).font_weight.is_bold());
    }

    #[test]
    fn test_legacy_tolerates_garbage() {
        let lines = lines_for("abc");
        let mut store = StyleStore::default();
        let value = json!({
            "0": {"0": {"italic": true}, "x": {}, "9": {"italic": true}, "1": {"fontSize": "huge"}},
            "1": {"0": {"italic": true}},
            "nope": 3,
            "2": 7
        });
        assert_eq!(import_legacy(&mut store, &value, &lines), 1);
        assert!(store.resolve(0).italic);
        assert_eq!(import_legacy(&mut store, &json!([1, 2]), &lines), 0);
    }

    #[test]
    fn test_legacy_keeps_valid_fields_beside_bad_ones() {
        let lines = lines_for("abc");
        let mut store = StyleStore::default();
        let value = json!({"0": {"0": {"italic": true, "fontSize": "huge", "textCase": "small-caps"}}});
        assert_eq!(import_legacy(&mut store, &value, &lines), 1);

        let kept = store.override_at(0).unwrap();
        assert_eq!(kept.italic, Some(true));
        assert_eq!(kept.font_size, None);
        assert_eq!(kept.text_case, None);
    }
}
