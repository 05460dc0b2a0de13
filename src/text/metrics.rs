//! Per-character positions and per-line geometry.
//!
//! Coordinates are element-local: `(0, 0)` is the element's top-left corner
//! and padding is already applied. Every glyph on a line shares the line's
//! baseline, which derives from the line's largest font size.

use crate::paragraph::{ParagraphStyle, TextOverflow, VerticalAlign};
use crate::style::ResolvedStyle;
use crate::text::measure::{MeasuredGlyph, TextMeasurer};
use crate::text::store::StyleStore;
use crate::text::wrap::Line;
use crate::unicode::{is_word_boundary, segment};

/// Tolerance when deciding whether a line fits a fixed height.
const FIT_EPSILON: f32 = 0.01;

/// One positioned character.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Linear offset of the character.
    pub offset: usize,
    /// Text to paint (after the case transform).
    pub display: String,
    pub x: f32,
    pub width: f32,
    pub style: ResolvedStyle,
}

impl GlyphMetrics {
    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Horizontal midpoint, the hit-testing boundary.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Geometry of one line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineMetrics {
    pub line: Line,
    /// Left edge of the first glyph (padding, indent and alignment applied).
    pub x: f32,
    /// Top of the line box.
    pub y: f32,
    pub height: f32,
    /// Shared baseline y.
    pub baseline: f32,
    /// Largest font size on the line.
    pub max_font_size: f32,
    /// Content width, excluding whitespace hanging past a soft wrap.
    pub width: f32,
    pub glyphs: Vec<GlyphMetrics>,
    /// Leading glyphs that are painted; the rest were cut for an ellipsis.
    pub painted: usize,
    /// False when the line overflows a fixed height and overflow is hidden.
    pub visible: bool,
    pub ellipsis: Option<GlyphMetrics>,
}

impl LineMetrics {
    /// Bottom of the line box.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// X of the caret before column `col`.
    #[must_use]
    pub fn caret_x(&self, col: usize) -> f32 {
        match self.glyphs.get(col) {
            Some(glyph) => glyph.x,
            None => self.glyphs.last().map_or(self.x, GlyphMetrics::right),
        }
    }

    /// Glyphs to paint.
    pub fn painted_glyphs(&self) -> impl Iterator<Item = &GlyphMetrics> {
        self.glyphs.iter().take(self.painted)
    }
}

/// Layout of the whole element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub lines: Vec<LineMetrics>,
    /// Widest line including its indent.
    pub content_width: f32,
    /// Height of the stacked line boxes.
    pub content_height: f32,
    /// Element width (fixed, or content plus padding when auto sized).
    pub width: f32,
    /// Element height (fixed, or content plus padding when auto sized).
    pub height: f32,
}

/// Everything the metrics pass reads.
pub struct MetricsInput<'a> {
    pub graphemes: &'a [String],
    pub glyphs: &'a [MeasuredGlyph],
    pub lines: &'a [Line],
    pub store: &'a StyleStore,
    pub paragraph: &'a ParagraphStyle,
    pub measurer: &'a dyn TextMeasurer,
    pub ascent_ratio: f32,
}

/// Position every character of every line.
#[must_use]
pub fn compute(input: &MetricsInput<'_>) -> TextMetrics {
    let paragraph = input.paragraph;
    let padding = paragraph.padding;

    let mut lines: Vec<LineMetrics> = input.lines.iter().map(|line| measure_line(input, *line)).collect();

    let content_width = lines
        .iter()
        .map(|l| l.line.indent + l.width)
        .fold(0.0f32, f32::max);
    let inner_width = paragraph.content_width().unwrap_or(content_width);

    for metrics in &mut lines {
        align_line(metrics, paragraph, inner_width, padding.left);
    }

    let mut cursor = 0.0f32;
    let last = lines.len().saturating_sub(1);
    for (i, metrics) in lines.iter_mut().enumerate() {
        metrics.y = cursor;
        cursor += metrics.height;
        if metrics.line.paragraph_end && i != last {
            cursor += paragraph.para_spacing;
        }
    }
    let content_height = cursor;

    let inner_height = paragraph.content_height();
    let v_offset = inner_height.map_or(0.0, |h| match paragraph.vertical_align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => ((h - content_height) / 2.0).max(0.0),
        VerticalAlign::Bottom => (h - content_height).max(0.0),
    });

    for metrics in &mut lines {
        let leading = (metrics.height - metrics.max_font_size) / 2.0;
        metrics.y += padding.top + v_offset;
        metrics.baseline = metrics.y + leading + metrics.max_font_size * input.ascent_ratio;
    }

    if let Some(h) = inner_height {
        if paragraph.text_overflow != TextOverflow::Show {
            clip_overflow(&mut lines, input, h, padding.top + v_offset, padding.left + inner_width);
        }
    }

    let width = match paragraph.content_width() {
        Some(_) => paragraph.width.unwrap_or_default(),
        None => content_width + padding.horizontal(),
    };
    let height = match paragraph.content_height() {
        Some(_) => paragraph.height.unwrap_or_default(),
        None => content_height + padding.vertical(),
    };

    tracing::trace!(
        lines = lines.len(),
        content_width,
        content_height,
        "computed text metrics"
    );

    TextMetrics {
        lines,
        content_width,
        content_height,
        width,
        height,
    }
}

fn measure_line(input: &MetricsInput<'_>, line: Line) -> LineMetrics {
    let mut glyphs = Vec::with_capacity(line.len);
    let mut x = 0.0f32;
    let mut prev_spacing = None;
    for offset in line.range() {
        let measured = &input.glyphs[offset];
        if let Some(spacing) = prev_spacing {
            x += spacing;
        }
        glyphs.push(GlyphMetrics {
            offset,
            display: measured.display.clone(),
            x,
            width: measured.width,
            style: input.store.resolve(offset),
        });
        x += measured.width;
        prev_spacing = Some(measured.spacing);
    }

    let counted = counted_glyphs(input.graphemes, &line);
    let width = counted
        .checked_sub(1)
        .map_or(0.0, |last| glyphs[last].right());

    let max_font_size = if glyphs.is_empty() {
        // An empty line takes the size of its newline, or of the text before it.
        let probe = if line.hard_break || line.start == 0 {
            line.start
        } else {
            line.start - 1
        };
        input.store.resolve(probe).font_size
    } else {
        glyphs.iter().map(|g| g.style.font_size).fold(0.0f32, f32::max)
    };

    let painted = glyphs.len();
    LineMetrics {
        line,
        x: 0.0,
        y: 0.0,
        height: input.paragraph.line_height_px(max_font_size),
        baseline: 0.0,
        max_font_size,
        width,
        glyphs,
        painted,
        visible: true,
        ellipsis: None,
    }
}

/// Glyphs that count toward the line width: all of them, minus whitespace
/// hanging at a soft wrap.
fn counted_glyphs(graphemes: &[String], line: &Line) -> usize {
    if line.paragraph_end {
        return line.len;
    }
    let hanging = graphemes[line.range()]
        .iter()
        .rev()
        .take_while(|g| is_word_boundary(g))
        .count();
    line.len - hanging
}

fn align_line(metrics: &mut LineMetrics, paragraph: &ParagraphStyle, inner_width: f32, left: f32) {
    use crate::paragraph::TextAlign;

    let align = paragraph.text_align;
    let leftover = inner_width - metrics.line.indent - metrics.width;
    let shift = match align {
        TextAlign::Center => leftover / 2.0,
        TextAlign::Right => leftover,
        _ => 0.0,
    };
    let origin = left + metrics.line.indent + shift;
    metrics.x = origin;

    let counted = if metrics.line.paragraph_end {
        metrics.glyphs.len()
    } else {
        metrics
            .glyphs
            .iter()
            .rposition(|g| !is_word_boundary(&g.display))
            .map_or(0, |i| i + 1)
    };
    let distribute = align.is_justified()
        && (align.justifies_last_line() || !metrics.line.paragraph_end)
        && counted > 1
        && leftover > 0.0;
    let gap = if distribute {
        leftover / (counted - 1) as f32
    } else {
        0.0
    };

    for (k, glyph) in metrics.glyphs.iter_mut().enumerate() {
        glyph.x += origin + gap * k.min(counted.saturating_sub(1)) as f32;
    }
}

fn clip_overflow(
    lines: &mut [LineMetrics],
    input: &MetricsInput<'_>,
    inner_height: f32,
    top: f32,
    right_edge: f32,
) {
    let mut last_visible = None;
    for (i, metrics) in lines.iter_mut().enumerate() {
        // The first line always shows, even when taller than the box.
        metrics.visible = i == 0 || metrics.bottom() - top <= inner_height + FIT_EPSILON;
        if metrics.visible {
            last_visible = Some(i);
        }
    }

    let TextOverflow::Ellipsis(ellipsis) = &input.paragraph.text_overflow else {
        return;
    };
    let Some(index) = last_visible else {
        return;
    };
    if index + 1 == lines.len() {
        return;
    }

    let metrics = &mut lines[index];
    let style = metrics
        .glyphs
        .last()
        .map_or_else(|| input.store.default_style().clone(), |g| g.style.clone());
    let font = style.font();
    let ellipsis_width: f32 = segment(ellipsis)
        .iter()
        .map(|g| input.measurer.measure(g, &font))
        .sum();
    let spacing = style.letter_spacing_px();

    let mut kept = metrics.glyphs.len();
    while kept > 0 && metrics.glyphs[kept - 1].right() + spacing + ellipsis_width > right_edge + FIT_EPSILON {
        kept -= 1;
    }
    let x = kept
        .checked_sub(1)
        .map_or(metrics.x, |last| metrics.glyphs[last].right() + spacing);

    metrics.painted = kept;
    metrics.ellipsis = Some(GlyphMetrics {
        offset: metrics.line.end(),
        display: ellipsis.clone(),
        x,
        width: ellipsis_width,
        style,
    });
}
