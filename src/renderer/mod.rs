//! Display-list rendering.
//!
//! [`render`] turns a laid-out [`RichTextBuffer`] plus session state into a
//! flat list of [`DrawCommand`]s in paint order. Hosts replay the list on
//! their canvas; nothing here touches a graphics API.
//!
//! Paint order: clip, selection highlight, per-glyph backgrounds, glyphs
//! (with their shadows and stroke), decorations, ellipsis, caret.
//!
//! Non-solid fills have no single color; they degrade to a flat color (see
//! [`Paint::flat_color`]).
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::renderer::{DrawCommand, RenderState, render};
//! use richtext_canvas::text::RichTextBuffer;
//!
//! let buffer = RichTextBuffer::with_text("hi");
//! let list = render(&buffer, &RenderState::default());
//! assert_eq!(list.glyphs().count(), 2);
//! ```

mod rect;

pub use rect::Rect;

use std::ops::Range;

use crate::color::Rgba;
use crate::paragraph::TextOverflow;
use crate::style::{
    FontWeight, Paint, ResolvedStyle, Shadow, StrokeAlign, StrokeCap, StrokeJoin, TextDecoration,
};
use crate::text::{GlyphMetrics, LineMetrics, RichTextBuffer, Selection};

/// Underline sits this fraction of the font size below the baseline.
const UNDERLINE_OFFSET: f32 = 0.1;
/// Strike-through sits this fraction of the font size above the baseline.
const LINE_THROUGH_OFFSET: f32 = 0.3;
/// Overline sits this fraction of the font size above the baseline.
const OVERLINE_OFFSET: f32 = 0.8;
/// Selected newlines show a sliver this fraction of the line's font size.
const NEWLINE_SELECTION_WIDTH: f32 = 0.25;

/// Font description owned by a draw command.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDesc {
    pub size: f32,
    pub family: String,
    pub weight: FontWeight,
    pub italic: bool,
}

/// Resolved stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeDesc {
    pub color: Rgba,
    pub width: f32,
    pub align: StrokeAlign,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
    pub dash: Option<Vec<f32>>,
}

/// One glyph to paint at a baseline position.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    pub offset: usize,
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub font: FontDesc,
    pub fill: Rgba,
    pub stroke: Option<StrokeDesc>,
    pub shadows: Vec<Shadow>,
    pub inner_shadows: Vec<Shadow>,
}

/// A drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Clip everything until the matching [`DrawCommand::PopClip`].
    PushClip(Rect),
    PopClip,
    /// Filled rectangle (selection highlight, text background).
    Fill { rect: Rect, color: Rgba },
    Glyph(GlyphRun),
    /// Horizontal decoration line.
    Line {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgba,
    },
    Caret { rect: Rect, color: Rgba },
}

/// Ordered draw commands for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
    /// Element size the list was laid out for.
    pub width: f32,
    pub height: f32,
}

impl DisplayList {
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Glyph commands in paint order.
    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Glyph(run) => Some(run),
            _ => None,
        })
    }

    /// Filled rectangles with their colors.
    pub fn fills(&self) -> impl Iterator<Item = (&Rect, Rgba)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill { rect, color } => Some((rect, *color)),
            _ => None,
        })
    }

    /// The caret, if one is drawn.
    #[must_use]
    pub fn caret(&self) -> Option<Rect> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Caret { rect, .. } => Some(*rect),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Session state that affects painting.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub editing: bool,
    pub selection: Selection,
    /// Blink phase; ignored while a range is selected.
    pub caret_visible: bool,
    pub cursor_color: Rgba,
    pub cursor_width: f32,
    pub selection_color: Rgba,
    /// Uncommitted IME text, underlined.
    pub composition: Option<Range<usize>>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            editing: false,
            selection: Selection::default(),
            caret_visible: true,
            cursor_color: Rgba::BLACK,
            cursor_width: 1.0,
            selection_color: Rgba::from_rgb_u8(0, 120, 215).with_alpha(0.3),
            composition: None,
        }
    }
}

/// Build the display list for `buffer`.
#[must_use]
pub fn render(buffer: &RichTextBuffer, state: &RenderState) -> DisplayList {
    let metrics = buffer.metrics();
    let mut list = DisplayList {
        commands: Vec::new(),
        width: metrics.width,
        height: metrics.height,
    };

    let paragraph = buffer.paragraph();
    let clipped =
        paragraph.content_height().is_some() && paragraph.text_overflow != TextOverflow::Show;
    if clipped {
        list.push(DrawCommand::PushClip(Rect::new(
            0.0,
            0.0,
            metrics.width,
            metrics.height,
        )));
    }

    let visible: Vec<&LineMetrics> = metrics.lines.iter().filter(|l| l.visible).collect();

    if state.editing && !state.selection.is_collapsed() {
        for line in &visible {
            if let Some(rect) = selection_rect(line, &state.selection) {
                list.push(DrawCommand::Fill {
                    rect,
                    color: state.selection_color,
                });
            }
        }
    }

    for line in &visible {
        for glyph in line.painted_glyphs() {
            let background = glyph.style.text_background_color.filter(|c| !c.is_transparent());
            if let Some(color) = background {
                list.push(DrawCommand::Fill {
                    rect: Rect::new(glyph.x, line.y, glyph.width, line.height),
                    color,
                });
            }
        }
    }

    for line in &visible {
        for glyph in line.painted_glyphs() {
            list.push(DrawCommand::Glyph(glyph_run(glyph, line.baseline)));
        }
        if let Some(ellipsis) = &line.ellipsis {
            list.push(DrawCommand::Glyph(glyph_run(ellipsis, line.baseline)));
        }
    }

    for line in &visible {
        for glyph in line.painted_glyphs() {
            push_decorations(&mut list, glyph, line.baseline);
        }
    }

    if let Some(range) = state.composition.as_ref().filter(|_| state.editing) {
        for line in &visible {
            for glyph in line.painted_glyphs().filter(|g| range.contains(&g.offset)) {
                list.push(DrawCommand::Line {
                    x1: glyph.x,
                    x2: glyph.right(),
                    y: line.baseline + glyph.style.font_size * UNDERLINE_OFFSET,
                    thickness: decoration_thickness(glyph.style.font_size),
                    color: glyph.style.fill_color(),
                });
            }
        }
    }

    if state.editing && state.caret_visible && state.selection.is_collapsed() {
        let location = buffer.location_of(state.selection.start);
        if let Some(line) = metrics.lines.get(location.line).filter(|l| l.visible) {
            list.push(DrawCommand::Caret {
                rect: Rect::new(
                    line.caret_x(location.column),
                    line.y,
                    state.cursor_width,
                    line.height,
                ),
                color: state.cursor_color,
            });
        }
    }

    if clipped {
        list.push(DrawCommand::PopClip);
    }
    list
}

/// Highlight for the part of `selection` on `line`, including a sliver for
/// a selected newline.
fn selection_rect(line: &LineMetrics, selection: &Selection) -> Option<Rect> {
    let start = selection.start.max(line.line.start);
    let end = selection.end.min(line.line.end());
    let newline_selected = line.line.hard_break
        && selection.start <= line.line.end()
        && selection.end > line.line.end();
    if start > end || (start == end && !newline_selected) {
        return None;
    }

    let x1 = line.caret_x(start - line.line.start);
    let mut x2 = line.caret_x(end - line.line.start);
    if newline_selected {
        x2 += line.max_font_size * NEWLINE_SELECTION_WIDTH;
    }
    Some(Rect::new(x1, line.y, x2 - x1, line.height))
}

fn glyph_run(glyph: &GlyphMetrics, baseline: f32) -> GlyphRun {
    let style = &glyph.style;
    GlyphRun {
        offset: glyph.offset,
        text: glyph.display.clone(),
        x: glyph.x,
        baseline,
        font: font_desc(style),
        fill: style.fill_color(),
        stroke: stroke_desc(style),
        shadows: style
            .shadow
            .as_ref()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default(),
        inner_shadows: style
            .inner_shadow
            .as_ref()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default(),
    }
}

fn font_desc(style: &ResolvedStyle) -> FontDesc {
    FontDesc {
        size: style.font_size,
        family: style.font_family.clone(),
        weight: style.font_weight,
        italic: style.italic,
    }
}

fn stroke_desc(style: &ResolvedStyle) -> Option<StrokeDesc> {
    let paint: &Paint = style.stroke.as_ref()?;
    if style.stroke_width <= 0.0 {
        return None;
    }
    Some(StrokeDesc {
        color: paint.flat_color(Rgba::BLACK),
        width: style.stroke_width,
        align: style.stroke_align,
        cap: style.stroke_cap,
        join: style.stroke_join,
        dash: style.dash_pattern.clone(),
    })
}

fn decoration_thickness(font_size: f32) -> f32 {
    (font_size / 16.0).max(1.0)
}

fn push_decorations(list: &mut DisplayList, glyph: &GlyphMetrics, baseline: f32) {
    let style = &glyph.style;
    let decoration = style.text_decoration;
    if decoration.is_empty() {
        return;
    }
    let size = style.font_size;
    let thickness = decoration_thickness(size);
    let color = style.fill_color();
    let offsets = [
        (TextDecoration::UNDERLINE, UNDERLINE_OFFSET),
        (TextDecoration::LINE_THROUGH, -LINE_THROUGH_OFFSET),
        (TextDecoration::OVERLINE, -OVERLINE_OFFSET),
    ];
    for (flag, offset) in offsets {
        if decoration.contains(flag) {
            list.push(DrawCommand::Line {
                x1: glyph.x,
                x2: glyph.right(),
                y: baseline + size * offset,
                thickness,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paragraph::ParagraphStyle;
    use crate::style::{CharStyle, ColorStop, Gradient, GradientKind};

    fn editing(selection: Selection) -> RenderState {
        RenderState {
            editing: true,
            selection,
            ..RenderState::default()
        }
    }

    #[test]
    fn test_glyphs_share_baseline() {
        let mut buffer = RichTextBuffer::with_text("Ab");
        buffer.set_range_style(0..1, &CharStyle::new().with_font_size(48.0));
        let list = render(&buffer, &RenderState::default());
        let baselines: Vec<f32> = list.glyphs().map(|g| g.baseline).collect();
        assert_eq!(baselines.len(), 2);
        assert!((baselines[0] - baselines[1]).abs() < f32::EPSILON);
        assert!(list.caret().is_none());
    }

    #[test]
    fn test_caret_only_when_collapsed_and_visible() {
        let buffer = RichTextBuffer::with_text("abc");
        let list = render(&buffer, &editing(Selection::caret(1)));
        let caret = list.caret().unwrap();
        assert!((caret.x - 9.6).abs() < 1e-4);

        let hidden = RenderState {
            caret_visible: false,
            ..editing(Selection::caret(1))
        };
        assert!(render(&buffer, &hidden).caret().is_none());
        assert!(render(&buffer, &editing(Selection::new(0, 2))).caret().is_none());
    }

    #[test]
    fn test_selection_spans_lines() {
        let buffer = RichTextBuffer::with_text("ab\ncd");
        let state = editing(Selection::new(1, 4));
        let list = render(&buffer, &state);
        let rects: Vec<Rect> = list
            .fills()
            .filter(|(_, c)| *c == state.selection_color)
            .map(|(r, _)| *r)
            .collect();
        assert_eq!(rects.len(), 2);
        // First line: "b" plus the newline sliver.
        assert!((rects[0].x - 9.6).abs() < 1e-4);
        assert!((rects[0].width - (9.6 + 4.0)).abs() < 1e-4);
        assert!((rects[1].width - 9.6).abs() < 1e-4);
    }

    #[test]
    fn test_gradient_fill_degrades() {
        let mut buffer = RichTextBuffer::with_text("a");
        let gradient = Paint::Gradient(Gradient {
            kind: GradientKind::Linear,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: Rgba::BLACK,
                },
                ColorStop {
                    offset: 1.0,
                    color: Rgba::WHITE,
                },
            ],
        });
        buffer.set_range_style(0..1, &CharStyle::new().with_fill(gradient));
        let list = render(&buffer, &RenderState::default());
        assert_eq!(list.glyphs().next().unwrap().fill, Rgba::new(128, 128, 128, 255));
    }

    #[test]
    fn test_decorations_and_background() {
        let mut buffer = RichTextBuffer::with_text("ab");
        buffer.set_range_style(
            0..1,
            &CharStyle::new()
                .with_decoration(TextDecoration::UNDERLINE | TextDecoration::LINE_THROUGH)
                .with_background(Rgba::WHITE),
        );
        let list = render(&buffer, &RenderState::default());
        let lines = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 2);
        assert_eq!(list.fills().count(), 1);
    }

    #[test]
    fn test_hidden_overflow_is_clipped() {
        let mut buffer = RichTextBuffer::with_text("a\nb\nc");
        buffer.set_paragraph(ParagraphStyle {
            auto_height: false,
            height: Some(30.0),
            text_overflow: TextOverflow::Hide,
            ..ParagraphStyle::default()
        });
        let list = render(&buffer, &RenderState::default());
        assert!(matches!(list.commands.first(), Some(DrawCommand::PushClip(_))));
        assert!(matches!(list.commands.last(), Some(DrawCommand::PopClip)));
        assert_eq!(list.glyphs().count(), 1);
    }
}
