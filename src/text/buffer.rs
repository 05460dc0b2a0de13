//! Styled text document with its derived layout.
//!
//! [`RichTextBuffer`] owns the text, the style store and the paragraph
//! style, and keeps the grapheme array, line array and metrics in sync with
//! them. Every mutating call relayouts before it returns, so readers never
//! observe stale geometry.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use crate::config::EditorConfig;
use crate::paragraph::ParagraphStyle;
use crate::style::{CharStyle, ResolvedStyle};
use crate::text::coords::{self, Location};
use crate::text::edit::{TextChange, diff_graphemes};
use crate::text::measure::{MeasuredGlyph, MonospaceMeasurer, TextMeasurer, measure_glyph, starts_word};
use crate::text::metrics::{self, MetricsInput, TextMetrics};
use crate::text::store::{OverrideMap, StyleStore};
use crate::text::wrap::{Line, break_lines};
use crate::unicode::segment;

/// Text, styles and layout of one element.
pub struct RichTextBuffer {
    text: String,
    graphemes: Vec<String>,
    glyphs: Vec<MeasuredGlyph>,
    store: StyleStore,
    paragraph: ParagraphStyle,
    lines: Vec<Line>,
    metrics: TextMetrics,
    measurer: Rc<dyn TextMeasurer>,
    min_wrap_width: f32,
    ascent_ratio: f32,
}

impl fmt::Debug for RichTextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichTextBuffer")
            .field("text", &self.text)
            .field("overrides", &self.store.override_count())
            .field("lines", &self.lines.len())
            .finish_non_exhaustive()
    }
}

impl Default for RichTextBuffer {
    fn default() -> Self {
        Self::new(
            "",
            ResolvedStyle::default(),
            ParagraphStyle::default(),
            Rc::new(MonospaceMeasurer::default()),
            &EditorConfig::default(),
        )
    }
}

impl RichTextBuffer {
    /// Create a laid-out buffer.
    #[must_use]
    pub fn new(
        text: &str,
        default_style: ResolvedStyle,
        paragraph: ParagraphStyle,
        measurer: Rc<dyn TextMeasurer>,
        config: &EditorConfig,
    ) -> Self {
        let mut buffer = Self {
            text: text.to_string(),
            graphemes: segment(text),
            glyphs: Vec::new(),
            store: StyleStore::new(default_style),
            paragraph,
            lines: Vec::new(),
            metrics: TextMetrics::default(),
            measurer,
            min_wrap_width: config.min_wrap_width,
            ascent_ratio: config.ascent_ratio,
        };
        buffer.relayout();
        buffer
    }

    /// Create an unstyled buffer with the default measurer.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.set_text(text);
        buffer
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn graphemes(&self) -> &[String] {
        &self.graphemes
    }

    /// Grapheme count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn store(&self) -> &StyleStore {
        &self.store
    }

    #[must_use]
    pub fn paragraph(&self) -> &ParagraphStyle {
        &self.paragraph
    }

    #[must_use]
    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Text of the graphemes in `range` (clamped).
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.graphemes[start..end].concat()
    }

    /// Effective style at `offset`. Offsets past the end report the last
    /// character's style, which is what newly typed text would inherit.
    #[must_use]
    pub fn style_at(&self, offset: usize) -> ResolvedStyle {
        self.store.resolve(offset.min(self.len().saturating_sub(1)))
    }

    /// Effective style of every character in `range`.
    #[must_use]
    pub fn styles_in(&self, range: Range<usize>) -> Vec<ResolvedStyle> {
        let end = range.end.min(self.len());
        (range.start.min(end)..end).map(|i| self.store.resolve(i)).collect()
    }

    /// Location of a linear offset.
    #[must_use]
    pub fn location_of(&self, offset: usize) -> Location {
        coords::linear_to_location(&self.lines, offset)
    }

    /// Linear offset of a location.
    #[must_use]
    pub fn offset_of(&self, location: Location) -> usize {
        coords::location_to_linear(&self.lines, location)
    }

    /// Offset nearest to an element-local point.
    #[must_use]
    pub fn offset_at_point(&self, x: f32, y: f32) -> usize {
        coords::pointer_to_offset(&self.metrics, x, y)
    }

    /// Recompute glyph measurements, lines and metrics.
    pub fn relayout(&mut self) {
        let measurer = self.measurer.as_ref();
        self.glyphs = self
            .graphemes
            .iter()
            .enumerate()
            .map(|(i, g)| {
                measure_glyph(
                    measurer,
                    g,
                    &self.store.resolve(i),
                    starts_word(&self.graphemes, i),
                )
            })
            .collect();
        self.lines = break_lines(
            &self.graphemes,
            &self.glyphs,
            &self.paragraph,
            self.min_wrap_width,
        );
        self.metrics = metrics::compute(&MetricsInput {
            graphemes: &self.graphemes,
            glyphs: &self.glyphs,
            lines: &self.lines,
            store: &self.store,
            paragraph: &self.paragraph,
            measurer,
            ascent_ratio: self.ascent_ratio,
        });
    }

    /// Replace the measurement backend.
    pub fn set_measurer(&mut self, measurer: Rc<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.relayout();
    }

    pub fn set_paragraph(&mut self, paragraph: ParagraphStyle) {
        self.paragraph = paragraph;
        self.relayout();
    }

    /// Edit the paragraph style in place.
    pub fn update_paragraph(&mut self, f: impl FnOnce(&mut ParagraphStyle)) {
        f(&mut self.paragraph);
        self.relayout();
    }

    pub fn set_default_style(&mut self, style: ResolvedStyle) {
        self.store.set_default_style(style);
        self.relayout();
    }

    /// Merge `patch` onto the characters in `range`.
    pub fn set_range_style(&mut self, range: Range<usize>, patch: &CharStyle) {
        self.store.set_range(range.start, range.end, self.len(), patch);
        self.relayout();
    }

    /// Revert the characters in `range` to the default style.
    pub fn clear_range_style(&mut self, range: Range<usize>) {
        self.store.clear_range(range.start, range.end, self.len());
        self.relayout();
    }

    /// Merge `patch` onto the default and every override.
    pub fn set_full_style(&mut self, patch: &CharStyle) {
        self.store.set_full(patch);
        self.relayout();
    }

    /// Drop every override.
    pub fn clear_full_style(&mut self) {
        self.store.clear_full();
        self.relayout();
    }

    /// Replace the text, migrating overrides across the changed region.
    pub fn apply_text_change(&mut self, new_text: &str) -> TextChange {
        let new_graphemes = segment(new_text);
        let change = diff_graphemes(&self.graphemes, &new_graphemes);
        if change.is_noop() && self.text == new_text {
            return change;
        }
        let extends = change.removed > 0
            && change.inserted > 0
            && new_graphemes[change.start].starts_with(self.graphemes[change.start].as_str());
        if extends {
            self.store
                .apply_extension(change.start, change.removed, change.inserted);
        } else {
            self.store
                .apply_change(change.start, change.removed, change.inserted);
        }
        self.store.truncate(new_graphemes.len());
        self.text = new_text.to_string();
        self.graphemes = new_graphemes;
        self.relayout();
        change
    }

    /// Replace the graphemes in `range` with `insert`.
    pub fn replace_range(&mut self, range: Range<usize>, insert: &str) -> TextChange {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let mut next = String::with_capacity(self.text.len() + insert.len());
        next.push_str(&self.graphemes[..start].concat());
        next.push_str(insert);
        next.push_str(&self.graphemes[end..].concat());
        self.apply_text_change(&next)
    }

    /// Replace the text without diffing; overrides past the new end are dropped.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.graphemes = segment(text);
        self.store.truncate(self.graphemes.len());
        self.relayout();
    }

    /// Shared handle to the current overrides.
    #[must_use]
    pub fn overrides(&self) -> Arc<OverrideMap> {
        self.store.overrides()
    }

    /// Restore text and styles captured earlier.
    pub fn restore(&mut self, text: &str, default_style: ResolvedStyle, overrides: Arc<OverrideMap>) {
        self.text = text.to_string();
        self.graphemes = segment(text);
        self.store.set_default_style(default_style);
        self.store.restore_overrides(overrides);
        self.relayout();
    }

    /// Mutable access to the store for bulk loads; call [`Self::relayout`] after.
    pub(crate) fn store_mut(&mut self) -> &mut StyleStore {
        &mut self.store
    }
}
