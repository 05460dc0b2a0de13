//! The text node: a rich-text element with an editing lifecycle.
//!
//! [`TextNode`] ties the document ([`RichTextBuffer`]), the selection, the
//! undo history and the editing session together behind the element's
//! public operations. Every mutating call relayouts and raises the redraw
//! flag before returning.
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::node::{TextNode, TextNodeOptions};
//! use richtext_canvas::{CharStyle, FontWeight};
//!
//! let mut node = TextNode::new(TextNodeOptions::with_text("Hello world"));
//! node.enter_editing(Some(0));
//! node.set_selection(0, 5);
//! node.set_selection_styles(&CharStyle::new().with_font_weight(FontWeight::BOLD));
//! assert!(node.get_style_at(4).font_weight.is_bold());
//! assert!(!node.get_style_at(5).font_weight.is_bold());
//!
//! node.undo();
//! assert!(!node.get_style_at(0).font_weight.is_bold());
//! ```

mod options;
mod session;

pub use options::TextNodeOptions;
pub use session::{
    BlinkTimer, Composition, EditSession, EditingCoordinator, EditingSession, InputProxy, NodeId,
};

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::color::Rgba;
use crate::config::EditorConfig;
use crate::error::Result;
use crate::input::{
    BlurTarget, ClickTracker, ClickType, Direction, EditorEvent, KeyAction, KeyEvent, PointerEvent,
};
use crate::paragraph::{AutoSizeAlign, ParagraphStyle};
use crate::renderer::{self, DisplayList, RenderState};
use crate::style::{CharStyle, ResolvedStyle};
use crate::text::coords::{column_at_x, line_end_offset};
use crate::text::segment::{self, LegacyStyles};
use crate::text::{
    History, Location, MonospaceMeasurer, RichTextBuffer, Selection, Snapshot, StyleRange,
    TextMeasurer, next_word_boundary, prev_word_boundary, word_range_at,
};

/// Lifecycle notification.
pub type EditingCallback = Box<dyn FnMut(&TextNode)>;

/// What the host should do after an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventResponse {
    /// Not consumed; the host may handle it.
    Ignored,
    Handled,
    /// Put this text on the clipboard.
    Copied(String),
    /// Read the clipboard and send it back as [`EditorEvent::Paste`].
    PasteRequested,
    /// Editing ended.
    Exited,
}

/// Rich-text element.
pub struct TextNode {
    buffer: RichTextBuffer,
    x: f32,
    y: f32,
    editable: bool,
    cursor_color: Rgba,
    cursor_width: f32,
    selection_color: Rgba,
    selection: Selection,
    history: History,
    session: Option<EditingSession>,
    clicks: ClickTracker,
    config: EditorConfig,
    needs_redraw: bool,
    on_editing_entered: Option<EditingCallback>,
    on_editing_exited: Option<EditingCallback>,
    coordinator: Option<Rc<EditingCoordinator>>,
    id: Option<NodeId>,
    self_handle: Option<Weak<RefCell<dyn EditSession>>>,
}

impl fmt::Debug for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNode")
            .field("id", &self.id)
            .field("buffer", &self.buffer)
            .field("selection", &self.selection)
            .field("editing", &self.is_editing())
            .finish_non_exhaustive()
    }
}

impl Default for TextNode {
    fn default() -> Self {
        Self::new(TextNodeOptions::default())
    }
}

impl TextNode {
    /// Create a node with the default measurer and configuration.
    #[must_use]
    pub fn new(options: TextNodeOptions) -> Self {
        Self::with_config(
            options,
            EditorConfig::default(),
            Rc::new(MonospaceMeasurer::default()),
        )
    }

    /// Create a node with explicit configuration and measurement backend.
    #[must_use]
    pub fn with_config(
        options: TextNodeOptions,
        config: EditorConfig,
        measurer: Rc<dyn TextMeasurer>,
    ) -> Self {
        let TextNodeOptions {
            text,
            x,
            y,
            style,
            paragraph,
            editable,
            cursor_color,
            cursor_width,
            selection_color,
            style_ranges,
            styles,
        } = options;

        let default_style = ResolvedStyle::default().overlay(&style);
        let mut buffer = RichTextBuffer::new(&text, default_style, paragraph, measurer, &config);
        load_styles(&mut buffer, style_ranges.as_deref(), styles.as_ref());

        let render_defaults = RenderState::default();
        Self {
            buffer,
            x,
            y,
            editable,
            cursor_color: cursor_color.unwrap_or(render_defaults.cursor_color),
            cursor_width: cursor_width.unwrap_or(render_defaults.cursor_width),
            selection_color: selection_color.unwrap_or(render_defaults.selection_color),
            selection: Selection::caret(0),
            history: History::with_max_depth(config.max_undo_depth),
            session: None,
            clicks: ClickTracker::new(config.multi_click_window, config.multi_click_distance),
            config,
            needs_redraw: true,
            on_editing_entered: None,
            on_editing_exited: None,
            coordinator: None,
            id: None,
            self_handle: None,
        }
    }

    /// Decode a node from its JSON form.
    ///
    /// # Errors
    ///
    /// See [`TextNodeOptions::from_json`].
    pub fn from_json(value: Value) -> Result<Self> {
        TextNodeOptions::from_json(value).map(Self::new)
    }

    /// Move the node behind a shared handle registered with `coordinator`,
    /// so that entering editing forces any other editor out.
    #[must_use]
    pub fn shared(mut self, coordinator: &Rc<EditingCoordinator>) -> Rc<RefCell<Self>> {
        self.id = Some(coordinator.register());
        self.coordinator = Some(Rc::clone(coordinator));
        Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let handle: Weak<RefCell<dyn EditSession>> = weak.clone();
            self.self_handle = Some(handle);
            RefCell::new(self)
        })
    }

    /// Coordinator id, for shared nodes.
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    // ---------------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Replace the text as one undoable edit, migrating styles.
    pub fn set_text(&mut self, text: &str) {
        if text == self.buffer.text() {
            return;
        }
        self.record_snapshot();
        self.mutate(|node| {
            node.buffer.apply_text_change(text);
            node.selection.clamp(node.buffer.len());
        });
    }

    #[must_use]
    pub fn buffer(&self) -> &RichTextBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
        if !editable {
            self.exit_editing();
        }
    }

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn selection_start(&self) -> usize {
        self.selection.start
    }

    #[must_use]
    pub fn selection_end(&self) -> usize {
        self.selection.end
    }

    /// Set the selection. Out-of-range and inverted bounds are normalized.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.buffer.len();
        self.selection = Selection::new(start.min(len), end.min(len));
        self.selection_changed();
    }

    /// Move the start bound, keeping the end.
    pub fn set_selection_start(&mut self, start: usize) {
        self.set_selection(start, self.selection.end);
    }

    /// Move the end bound, keeping the start.
    pub fn set_selection_end(&mut self, end: usize) {
        self.set_selection(self.selection.start, end);
    }

    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.needs_redraw = true;
    }

    /// Element size after layout.
    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        let metrics = self.buffer.metrics();
        (metrics.width, metrics.height)
    }

    #[must_use]
    pub fn paragraph(&self) -> &ParagraphStyle {
        self.buffer.paragraph()
    }

    pub fn set_paragraph(&mut self, paragraph: ParagraphStyle) {
        self.mutate(|node| node.buffer.set_paragraph(paragraph));
    }

    /// Edit the paragraph style in place.
    pub fn update_paragraph(&mut self, f: impl FnOnce(&mut ParagraphStyle)) {
        self.mutate(|node| node.buffer.update_paragraph(f));
    }

    #[must_use]
    pub fn default_style(&self) -> &ResolvedStyle {
        self.buffer.store().default_style()
    }

    pub fn set_cursor_color(&mut self, color: Rgba) {
        self.cursor_color = color;
        self.needs_redraw = true;
    }

    pub fn set_cursor_width(&mut self, width: f32) {
        self.cursor_width = width;
        self.needs_redraw = true;
    }

    pub fn set_selection_color(&mut self, color: Rgba) {
        self.selection_color = color;
        self.needs_redraw = true;
    }

    /// Load the legacy nested style map, as a property write. Not undoable.
    pub fn set_legacy_styles(&mut self, styles: &Value) {
        self.mutate(|node| {
            let lines = node.buffer.lines().to_vec();
            let loaded = segment::import_legacy(node.buffer.store_mut(), styles, &lines);
            debug!(loaded, "loaded legacy styles");
            node.buffer.relayout();
        });
    }

    pub fn set_on_editing_entered(&mut self, callback: impl FnMut(&Self) + 'static) {
        self.on_editing_entered = Some(Box::new(callback));
    }

    pub fn set_on_editing_exited(&mut self, callback: impl FnMut(&Self) + 'static) {
        self.on_editing_exited = Some(Box::new(callback));
    }

    /// Whether something changed since the last call.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ---------------------------------------------------------------------
    // Editing lifecycle
    // ---------------------------------------------------------------------

    /// Start editing, with the caret at `caret` or at the end of the text.
    ///
    /// Returns false for non-editable nodes. Re-entering only moves the
    /// caret.
    pub fn enter_editing(&mut self, caret: Option<usize>) -> bool {
        if !self.editable {
            return false;
        }
        let len = self.buffer.len();
        let caret = caret.unwrap_or(len).min(len);
        if self.is_editing() {
            self.selection = Selection::caret(caret);
            self.selection_changed();
            return true;
        }

        if let (Some(coordinator), Some(id), Some(handle)) =
            (self.coordinator.clone(), self.id, self.self_handle.clone())
        {
            coordinator.request_editing(id, handle);
        }
        self.session = Some(EditingSession::new(self.config.caret_blink_interval));
        self.selection = Selection::caret(caret);
        self.needs_redraw = true;
        debug!(id = ?self.id, caret, "entered editing");
        self.notify(|node| &mut node.on_editing_entered);
        true
    }

    /// Stop editing and release the session. No-op when idle.
    pub fn exit_editing(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        drop(session);
        if let (Some(coordinator), Some(id)) = (&self.coordinator, self.id) {
            coordinator.clear_active(id);
        }
        self.needs_redraw = true;
        debug!(id = ?self.id, "exited editing");
        self.notify(|node| &mut node.on_editing_exited);
    }

    /// Give focus back to the input proxy. Idempotent.
    pub fn refocus(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.proxy.focus())
    }

    /// Whether the input proxy has focus.
    #[must_use]
    pub fn has_focus(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.proxy.is_focused())
    }

    /// Advance the caret blink. Returns whether a redraw is needed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let collapsed = self.selection.is_collapsed();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !collapsed {
            return false;
        }
        let changed = session.blink.tick(elapsed);
        self.needs_redraw |= changed;
        changed
    }

    /// Whether the caret is currently painted.
    #[must_use]
    pub fn caret_visible(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| self.selection.is_collapsed() && s.blink.visible())
    }

    fn notify(&mut self, slot: fn(&mut Self) -> &mut Option<EditingCallback>) {
        if let Some(mut callback) = slot(self).take() {
            callback(self);
            let current = slot(self);
            if current.is_none() {
                *current = Some(callback);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Styles
    // ---------------------------------------------------------------------

    /// Merge `patch` onto the selected characters. No-op without a selection.
    pub fn set_selection_styles(&mut self, patch: &CharStyle) {
        if self.selection.is_collapsed() || patch.is_empty() {
            return;
        }
        self.record_snapshot();
        let range = self.selection.range();
        self.mutate(|node| node.buffer.set_range_style(range, patch));
    }

    /// Merge `patch` onto every character and the default style.
    pub fn set_full_text_styles(&mut self, patch: &CharStyle) {
        if patch.is_empty() {
            return;
        }
        self.record_snapshot();
        self.mutate(|node| node.buffer.set_full_style(patch));
    }

    /// Revert the selected characters to the default. No-op without a selection.
    pub fn clear_selection_styles(&mut self) {
        if self.selection.is_collapsed() {
            return;
        }
        self.record_snapshot();
        let range = self.selection.range();
        self.mutate(|node| node.buffer.clear_range_style(range));
    }

    /// Drop every override; the default style stays.
    pub fn clear_full_text_styles(&mut self) {
        self.record_snapshot();
        self.mutate(|node| node.buffer.clear_full_style());
    }

    /// Resolved style of each selected character.
    #[must_use]
    pub fn get_selection_styles(&self) -> Vec<ResolvedStyle> {
        self.buffer.styles_in(self.selection.range())
    }

    /// Resolved style at `offset` (clamped).
    #[must_use]
    pub fn get_style_at(&self, offset: usize) -> ResolvedStyle {
        self.buffer.style_at(offset)
    }

    /// Overrides as maximal ranges.
    #[must_use]
    pub fn style_ranges(&self) -> Vec<StyleRange> {
        segment::export_ranges(self.buffer.store())
    }

    /// Overrides as the legacy nested line/column map.
    #[must_use]
    pub fn legacy_styles(&self) -> LegacyStyles {
        segment::export_legacy(self.buffer.store(), self.buffer.lines())
    }

    // ---------------------------------------------------------------------
    // Selection movement
    // ---------------------------------------------------------------------

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.buffer.len());
        self.selection_changed();
    }

    /// Select the word around `offset`.
    pub fn select_word_at(&mut self, offset: usize) {
        let range = word_range_at(self.buffer.graphemes(), offset);
        self.selection = Selection::new(range.start, range.end);
        self.selection_changed();
    }

    /// Select the line-array line containing `offset`.
    pub fn select_line_at(&mut self, offset: usize) {
        let location = self.buffer.location_of(offset);
        if let Some(line) = self.buffer.lines().get(location.line) {
            self.selection = Selection::new(line.start, line.end());
            self.selection_changed();
        }
    }

    /// Move one grapheme left or right.
    ///
    /// Without `extend`, a ranged selection collapses to the edge in the
    /// direction of travel.
    pub fn move_cursor(&mut self, forward: bool, extend: bool) {
        let target = if !extend && !self.selection.is_collapsed() {
            if forward {
                self.selection.end
            } else {
                self.selection.start
            }
        } else {
            let focus = self.selection.focus();
            if forward {
                (focus + 1).min(self.buffer.len())
            } else {
                focus.saturating_sub(1)
            }
        };
        self.update_selection(target, extend);
    }

    /// Move to the next or previous word boundary.
    pub fn move_by_word(&mut self, forward: bool, extend: bool) {
        let focus = self.selection.focus();
        let graphemes = self.buffer.graphemes();
        let target = if forward {
            next_word_boundary(graphemes, focus)
        } else {
            prev_word_boundary(graphemes, focus)
        };
        self.update_selection(target, extend);
    }

    /// Move `lines` lines up (negative) or down, keeping the horizontal
    /// position across consecutive vertical moves.
    pub fn move_vertical(&mut self, lines: isize, extend: bool) {
        let focus = self.selection.focus();
        let location = self.buffer.location_of(focus);
        let metrics = self.buffer.metrics();
        let Some(current) = metrics.lines.get(location.line) else {
            return;
        };
        let goal_x = self
            .session
            .as_ref()
            .and_then(|s| s.goal_x)
            .unwrap_or_else(|| current.caret_x(location.column));

        let target_line = location.line.checked_add_signed(lines);
        let target = match target_line.and_then(|i| metrics.lines.get(i)) {
            Some(line) => {
                let column = column_at_x(line, goal_x);
                if column == line.line.len {
                    line_end_offset(line)
                } else {
                    line.line.start + column
                }
            }
            None if lines < 0 => 0,
            None => self.buffer.len(),
        };
        self.update_selection(target, extend);
        if let Some(session) = self.session.as_mut() {
            session.goal_x = Some(goal_x);
        }
    }

    /// Move to the start or end of the current line.
    ///
    /// The end of a soft-wrapped line stops before whitespace hanging past
    /// the wrap.
    pub fn move_to_line_edge(&mut self, end: bool, extend: bool) {
        let location = self.buffer.location_of(self.selection.focus());
        let Some(line) = self.buffer.metrics().lines.get(location.line) else {
            return;
        };
        let target = if end {
            line_end_offset(line)
        } else {
            line.line.start
        };
        self.update_selection(target, extend);
    }

    /// Collapse to, or extend the selection to, `offset`.
    pub fn update_selection(&mut self, offset: usize, extend: bool) {
        self.selection.update(offset.min(self.buffer.len()), extend);
        self.selection_changed();
    }

    fn selection_changed(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.blink.reset();
            session.goal_x = None;
        }
        self.needs_redraw = true;
    }

    /// Location of the selection's moving end.
    #[must_use]
    pub fn caret_location(&self) -> Location {
        self.buffer.location_of(self.selection.focus())
    }

    // ---------------------------------------------------------------------
    // Text editing
    // ---------------------------------------------------------------------

    /// Replace the selection with `text` and place the caret after it.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() && self.selection.is_collapsed() {
            return;
        }
        self.record_snapshot();
        let range = self.selection.range();
        self.replace_and_place_caret(range, text);
    }

    /// Delete the selection, or the grapheme (or word) before the caret.
    pub fn delete_backward(&mut self, by_word: bool) {
        let range = if self.selection.is_collapsed() {
            let caret = self.selection.start;
            if caret == 0 {
                return;
            }
            let start = if by_word {
                prev_word_boundary(self.buffer.graphemes(), caret)
            } else {
                caret - 1
            };
            start..caret
        } else {
            self.selection.range()
        };
        self.record_snapshot();
        self.replace_and_place_caret(range, "");
    }

    /// Delete the selection, or the grapheme (or word) after the caret.
    pub fn delete_forward(&mut self, by_word: bool) {
        let range = if self.selection.is_collapsed() {
            let caret = self.selection.start;
            if caret >= self.buffer.len() {
                return;
            }
            let end = if by_word {
                next_word_boundary(self.buffer.graphemes(), caret)
            } else {
                caret + 1
            };
            caret..end
        } else {
            self.selection.range()
        };
        self.record_snapshot();
        self.replace_and_place_caret(range, "");
    }

    /// Selected text, if any.
    #[must_use]
    pub fn copy(&self) -> Option<String> {
        (!self.selection.is_collapsed()).then(|| self.buffer.slice(self.selection.range()))
    }

    /// Remove and return the selected text.
    pub fn cut(&mut self) -> Option<String> {
        let copied = self.copy()?;
        self.record_snapshot();
        let range = self.selection.range();
        self.replace_and_place_caret(range, "");
        Some(copied)
    }

    /// Replace the selection with clipboard text.
    pub fn paste(&mut self, text: &str) {
        self.insert_text(text);
    }

    /// Apply a whole-text replacement produced by an input method, diffing
    /// against the current text to migrate styles.
    pub fn apply_text_change(&mut self, new_text: &str) {
        if new_text == self.buffer.text() {
            return;
        }
        self.record_snapshot();
        self.mutate(|node| {
            let change = node.buffer.apply_text_change(new_text);
            node.selection = Selection::caret(change.inserted_end().min(node.buffer.len()));
        });
    }

    /// Replace `range` and put the caret after the replacement. The text
    /// after the range keeps its length, so the caret is counted from the end.
    fn replace_and_place_caret(&mut self, range: Range<usize>, text: &str) {
        let tail = self.buffer.len() - range.end.min(self.buffer.len());
        self.mutate(|node| {
            node.buffer.replace_range(range, text);
            let caret = node.buffer.len().saturating_sub(tail);
            node.selection = Selection::caret(caret);
        });
    }

    // ---------------------------------------------------------------------
    // IME composition
    // ---------------------------------------------------------------------

    /// Begin a composition, replacing the selection. One undo step covers
    /// the whole composition.
    pub fn composition_start(&mut self) {
        if !self.is_editing() {
            return;
        }
        self.record_snapshot();
        let range = self.selection.range();
        if !range.is_empty() {
            self.replace_and_place_caret(range, "");
        }
        let start = self.selection.start;
        if let Some(session) = self.session.as_mut() {
            session
                .proxy
                .set_composition(Some(Composition { start, len: 0 }));
        }
    }

    /// Replace the composed text with `text`.
    pub fn composition_update(&mut self, text: &str) {
        let Some(composition) = self.composition() else {
            return;
        };
        let range = composition.start..composition.start + composition.len;
        let before = self.buffer.len();
        self.replace_and_place_caret(range, text);
        let len = (self.buffer.len() + composition.len).saturating_sub(before);
        if let Some(session) = self.session.as_mut() {
            session.proxy.set_composition(Some(Composition {
                start: composition.start,
                len,
            }));
        }
    }

    /// Commit the composition as `text`.
    pub fn composition_end(&mut self, text: &str) {
        let Some(composition) = self.composition() else {
            return;
        };
        let range = composition.start..composition.start + composition.len;
        self.replace_and_place_caret(range, text);
        if let Some(session) = self.session.as_mut() {
            session.proxy.set_composition(None);
        }
    }

    /// The live composition, if any.
    #[must_use]
    pub fn composition(&self) -> Option<Composition> {
        self.session.as_ref().and_then(|s| s.proxy.composition())
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.buffer.text().to_string(),
            default_style: self.buffer.store().default_style().clone(),
            overrides: self.buffer.overrides(),
            selection: self.selection,
        }
    }

    /// Push the current state onto the undo stack and clear redo.
    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            text,
            default_style,
            overrides,
            selection,
        } = snapshot;
        if let Some(session) = self.session.as_mut() {
            session.proxy.set_composition(None);
        }
        self.mutate(|node| {
            node.buffer.restore(&text, default_style, overrides);
            node.selection = selection;
            node.selection.clamp(node.buffer.len());
        });
    }

    /// Undo the last mutation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        debug!(remaining = self.history.undo_depth(), "undo");
        self.restore(previous);
        true
    }

    /// Redo the last undone mutation.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        debug!(remaining = self.history.redo_depth(), "redo");
        self.restore(next);
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Register a press for multi-click detection.
    pub fn register_click(&mut self, event: &PointerEvent) -> ClickType {
        self.clicks.register(event.x, event.y, event.time)
    }

    /// Press: place the caret, or select a word or line on repeated taps.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> EventResponse {
        if !self.is_editing() {
            return EventResponse::Ignored;
        }
        let offset = self.buffer.offset_at_point(event.x, event.y);
        let click = self.register_click(event);
        let dragging = match click {
            ClickType::Single => {
                self.update_selection(offset, event.shift());
                true
            }
            ClickType::Double => {
                self.select_word_at(offset);
                false
            }
            ClickType::Triple => {
                self.select_line_at(offset);
                false
            }
        };
        if let Some(session) = self.session.as_mut() {
            session.dragging = dragging;
            session.proxy.focus();
        }
        EventResponse::Handled
    }

    /// Drag: extend from the press point.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> EventResponse {
        let dragging = self.session.as_ref().is_some_and(|s| s.dragging);
        if !dragging {
            return EventResponse::Ignored;
        }
        let offset = self.buffer.offset_at_point(event.x, event.y);
        self.update_selection(offset, true);
        EventResponse::Handled
    }

    /// Release: end any drag.
    pub fn pointer_up(&mut self, _event: &PointerEvent) -> EventResponse {
        match self.session.as_mut() {
            Some(session) if session.dragging => {
                session.dragging = false;
                EventResponse::Handled
            }
            _ => EventResponse::Ignored,
        }
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: &KeyEvent) -> EventResponse {
        if !self.is_editing() {
            return EventResponse::Ignored;
        }
        let Some(action) = key.action() else {
            return EventResponse::Ignored;
        };
        match action {
            KeyAction::Move {
                direction,
                extend,
                by_word,
            } => match direction {
                Direction::Left | Direction::Right => {
                    let forward = direction == Direction::Right;
                    if by_word {
                        self.move_by_word(forward, extend);
                    } else {
                        self.move_cursor(forward, extend);
                    }
                }
                Direction::Up => self.move_vertical(-1, extend),
                Direction::Down => self.move_vertical(1, extend),
            },
            KeyAction::LineEdge { end, extend } => self.move_to_line_edge(end, extend),
            KeyAction::SelectAll => self.select_all(),
            KeyAction::Undo => {
                self.undo();
            }
            KeyAction::Redo => {
                self.redo();
            }
            KeyAction::Copy => {
                return self.copy().map_or(EventResponse::Ignored, EventResponse::Copied);
            }
            KeyAction::Cut => {
                return self.cut().map_or(EventResponse::Ignored, EventResponse::Copied);
            }
            KeyAction::Paste => return EventResponse::PasteRequested,
            KeyAction::DeleteBackward { by_word } => self.delete_backward(by_word),
            KeyAction::DeleteForward { by_word } => self.delete_forward(by_word),
            KeyAction::Newline => self.insert_text("\n"),
            KeyAction::Insert(c) => self.insert_text(c.encode_utf8(&mut [0; 4])),
            KeyAction::Exit => {
                self.exit_editing();
                return EventResponse::Exited;
            }
        }
        EventResponse::Handled
    }

    /// Dispatch any input event.
    pub fn handle_event(&mut self, event: &EditorEvent) -> EventResponse {
        if !self.is_editing() {
            return EventResponse::Ignored;
        }
        match event {
            EditorEvent::Key(key) => self.handle_key(key),
            EditorEvent::PointerDown(p) => self.pointer_down(p),
            EditorEvent::PointerMove(p) => self.pointer_move(p),
            EditorEvent::PointerUp(p) => self.pointer_up(p),
            EditorEvent::CompositionStart => {
                self.composition_start();
                EventResponse::Handled
            }
            EditorEvent::CompositionUpdate(text) => {
                self.composition_update(text);
                EventResponse::Handled
            }
            EditorEvent::CompositionEnd(text) => {
                self.composition_end(text);
                EventResponse::Handled
            }
            EditorEvent::Paste(text) => {
                self.paste(text);
                EventResponse::Handled
            }
            EditorEvent::Blur(BlurTarget::Outside) => {
                self.exit_editing();
                EventResponse::Exited
            }
            EditorEvent::Blur(BlurTarget::EditorControl) => {
                if let Some(session) = self.session.as_mut() {
                    session.proxy.blur();
                }
                EventResponse::Handled
            }
        }
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// Build this frame's display list.
    #[must_use]
    pub fn render(&self) -> DisplayList {
        let state = RenderState {
            editing: self.is_editing(),
            selection: self.selection,
            caret_visible: self.caret_visible(),
            cursor_color: self.cursor_color,
            cursor_width: self.cursor_width,
            selection_color: self.selection_color,
            composition: self
                .composition()
                .map(|c| c.start..c.start + c.len)
                .filter(|r| !r.is_empty()),
        };
        renderer::render(&self.buffer, &state)
    }

    /// Construction options reproducing this node's document state.
    /// Session state (selection, caret and highlight colors) is left out.
    #[must_use]
    pub fn to_options(&self) -> TextNodeOptions {
        let ranges = self.style_ranges();
        TextNodeOptions {
            text: self.buffer.text().to_string(),
            x: self.x,
            y: self.y,
            style: self.default_style().to_char_style(),
            paragraph: self.buffer.paragraph().clone(),
            editable: self.editable,
            cursor_color: None,
            cursor_width: None,
            selection_color: None,
            style_ranges: Some(ranges),
            styles: None,
        }
    }

    /// Serialize the document state.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.to_options()).unwrap_or(Value::Null)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Run a layout-affecting change, keeping the auto-size anchor.
    fn mutate(&mut self, f: impl FnOnce(&mut Self)) {
        let before = self.buffer.metrics().width;
        f(self);
        let paragraph = self.buffer.paragraph();
        if paragraph.auto_width {
            let delta = self.buffer.metrics().width - before;
            match paragraph.auto_size_align {
                AutoSizeAlign::Left => {}
                AutoSizeAlign::Center => self.x -= delta / 2.0,
                AutoSizeAlign::Right => self.x -= delta,
            }
        }
        if let Some(session) = self.session.as_mut() {
            session.blink.reset();
            session.goal_x = None;
        }
        self.needs_redraw = true;
    }
}

impl EditSession for TextNode {
    fn force_exit(&mut self) {
        self.exit_editing();
    }
}

impl Drop for TextNode {
    fn drop(&mut self) {
        if self.is_editing() {
            if let (Some(coordinator), Some(id)) = (&self.coordinator, self.id) {
                coordinator.clear_active(id);
            }
        }
    }
}

fn load_styles(buffer: &mut RichTextBuffer, ranges: Option<&[StyleRange]>, legacy: Option<&Value>) {
    let len = buffer.len();
    if let Some(ranges) = ranges {
        let applied = segment::import_ranges(buffer.store_mut(), ranges, len);
        debug!(ranges = ranges.len(), applied, "imported style ranges");
    } else if let Some(legacy) = legacy {
        let lines = buffer.lines().to_vec();
        let loaded = segment::import_legacy(buffer.store_mut(), legacy, &lines);
        debug!(loaded, "imported legacy styles");
    } else {
        return;
    }
    buffer.relayout();
}
