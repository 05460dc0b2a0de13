//! Line breaking.
//!
//! A pure function of the measured graphemes and the paragraph style. Each
//! newline grapheme ends a paragraph and belongs to no line; it is the one
//! offset between a line's end and the next line's start. Soft-wrapped
//! lines keep every grapheme, so a wrapped line's end offset equals the
//! next line's start.

use std::ops::Range;

use crate::paragraph::{ParagraphStyle, TextWrap};
use crate::text::measure::MeasuredGlyph;
use crate::unicode::{is_newline, is_word_boundary};

/// One line of the line array, as a run of linear offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// Offset of the first grapheme.
    pub start: usize,
    /// Number of graphemes (excluding any terminating newline).
    pub len: usize,
    /// Leading horizontal offset (paragraph indent on first lines).
    pub indent: f32,
    /// Terminated by a newline grapheme.
    pub hard_break: bool,
    /// First line of its paragraph.
    pub paragraph_start: bool,
    /// Last line of its paragraph.
    pub paragraph_end: bool,
}

impl Line {
    /// Offset just past the last grapheme.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Width of `glyphs[range]` with letter spacing between neighbours.
#[must_use]
pub fn run_width(glyphs: &[MeasuredGlyph], range: Range<usize>) -> f32 {
    let mut width = 0.0;
    let mut prev_spacing = None;
    for glyph in &glyphs[range] {
        if let Some(spacing) = prev_spacing {
            width += spacing;
        }
        width += glyph.width;
        prev_spacing = Some(glyph.spacing);
    }
    width
}

/// Split `graphemes` into lines.
///
/// `glyphs` holds the measurement of every grapheme, index for index.
/// Wrapping only happens for a fixed width with a wrap mode other than
/// [`TextWrap::None`], and is abandoned for newline-only splitting when the
/// usable width falls below `min_wrap_width`.
#[must_use]
pub fn break_lines(
    graphemes: &[String],
    glyphs: &[MeasuredGlyph],
    paragraph: &ParagraphStyle,
    min_wrap_width: f32,
) -> Vec<Line> {
    debug_assert_eq!(graphemes.len(), glyphs.len());

    let max_width = paragraph
        .content_width()
        .filter(|_| paragraph.wraps())
        .filter(|w| *w >= min_wrap_width);

    let mut lines = Vec::new();
    let mut para_start = 0;
    for (i, g) in graphemes.iter().enumerate() {
        if is_newline(g) {
            wrap_paragraph(&mut lines, graphemes, glyphs, para_start..i, true, paragraph, max_width);
            para_start = i + 1;
        }
    }
    wrap_paragraph(
        &mut lines,
        graphemes,
        glyphs,
        para_start..graphemes.len(),
        false,
        paragraph,
        max_width,
    );
    lines
}

fn wrap_paragraph(
    lines: &mut Vec<Line>,
    graphemes: &[String],
    glyphs: &[MeasuredGlyph],
    para: Range<usize>,
    hard_break: bool,
    paragraph: &ParagraphStyle,
    max_width: Option<f32>,
) {
    let indent = paragraph.para_indent;
    let Some(max_width) = max_width else {
        lines.push(Line {
            start: para.start,
            len: para.len(),
            indent,
            hard_break,
            paragraph_start: true,
            paragraph_end: true,
        });
        return;
    };

    let word_mode = paragraph.text_wrap == TextWrap::Normal;
    let mut line_start = para.start;
    let mut line_indent = indent;
    let mut current_width = 0.0f32;
    let mut prev_spacing = 0.0f32;
    let mut last_break: Option<usize> = None;
    let mut i = para.start;

    while i < para.end {
        let glyph = &glyphs[i];
        let boundary = is_word_boundary(&graphemes[i]);
        let advance = if i == line_start {
            glyph.width
        } else {
            prev_spacing + glyph.width
        };
        let limit = (max_width - line_indent).max(0.0);

        // Whitespace never starts a new line; it hangs past the edge.
        if i > line_start && !boundary && current_width + advance > limit {
            let break_at = if word_mode {
                last_break.unwrap_or(i)
            } else {
                i
            };
            lines.push(Line {
                start: line_start,
                len: break_at - line_start,
                indent: line_indent,
                hard_break: false,
                paragraph_start: line_start == para.start,
                paragraph_end: false,
            });
            line_start = break_at;
            line_indent = 0.0;
            current_width = 0.0;
            prev_spacing = 0.0;
            last_break = None;
            i = break_at;
            continue;
        }

        current_width += advance;
        prev_spacing = glyph.spacing;
        if boundary {
            last_break = Some(i + 1);
        }
        i += 1;
    }

    lines.push(Line {
        start: line_start,
        len: para.end - line_start,
        indent: line_indent,
        hard_break,
        paragraph_start: line_start == para.start,
        paragraph_end: true,
    });
}
