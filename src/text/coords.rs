//! Conversions between linear offsets, (line, column) locations, and
//! element-local points.
//!
//! Only newline graphemes sit between lines, so a soft-wrapped line's end
//! offset is also the next line's start. That offset resolves to the start
//! of the next line.

use crate::text::metrics::{LineMetrics, TextMetrics};
use crate::text::wrap::Line;
use crate::unicode::is_word_boundary;

/// A (line, column) position in the line array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Total grapheme count covered by `lines`, newlines included.
#[must_use]
pub fn text_len(lines: &[Line]) -> usize {
    lines.last().map_or(0, Line::end)
}

/// Location of `offset`; offsets past the end clamp to the last line's end.
#[must_use]
pub fn linear_to_location(lines: &[Line], offset: usize) -> Location {
    let last = lines.len().saturating_sub(1);
    for (index, line) in lines.iter().enumerate() {
        let end = line.end();
        if offset < end || (offset == end && (line.hard_break || index == last)) {
            return Location::new(index, offset.saturating_sub(line.start));
        }
    }
    lines
        .last()
        .map_or_else(Location::default, |line| Location::new(last, line.len))
}

/// Offset of `location`; out-of-range lines and columns clamp.
#[must_use]
pub fn location_to_linear(lines: &[Line], location: Location) -> usize {
    let Some(line) = lines.get(location.line).or_else(|| lines.last()) else {
        return 0;
    };
    line.start + location.column.min(line.len)
}

/// Column in `line` nearest to `x`, by glyph midpoints.
#[must_use]
pub fn column_at_x(line: &LineMetrics, x: f32) -> usize {
    line.glyphs
        .iter()
        .position(|g| g.midpoint() > x)
        .unwrap_or(line.glyphs.len())
}

/// Offset nearest to the element-local point `(x, y)`.
///
/// Points above or below the text clamp to the first or last visible line.
/// Past the end of a soft-wrapped line, the caret lands before the
/// whitespace hanging at the wrap so it stays on the clicked line.
#[must_use]
pub fn pointer_to_offset(metrics: &TextMetrics, x: f32, y: f32) -> usize {
    let mut visible = metrics.lines.iter().filter(|l| l.visible).peekable();
    let Some(first) = visible.peek().copied() else {
        return 0;
    };
    let line = visible.find(|l| y < l.bottom()).unwrap_or_else(|| {
        metrics
            .lines
            .iter()
            .rev()
            .find(|l| l.visible)
            .unwrap_or(first)
    });

    let column = column_at_x(line, x);
    if column == line.glyphs.len() {
        return line_end_offset(line);
    }
    line.line.start + column
}

/// Caret offset at the end of `line`.
///
/// Whitespace hanging past a soft wrap keeps the caret before it. Any other
/// last grapheme puts the caret after it, on the next line's start offset.
#[must_use]
pub fn line_end_offset(line: &LineMetrics) -> usize {
    let soft_wrapped = !line.line.hard_break && !line.line.paragraph_end;
    let hangs = soft_wrapped
        && line
            .glyphs
            .last()
            .is_some_and(|g| is_word_boundary(&g.display));
    if hangs {
        line.line.end() - 1
    } else {
        line.line.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(start: usize, len: usize, hard_break: bool, paragraph_end: bool) -> Line {
        Line {
            start,
            len,
            indent: 0.0,
            hard_break,
            paragraph_start: true,
            paragraph_end,
        }
    }

    /// "ab\ncd" with "cd" soft-wrapped after "c".
    fn sample() -> Vec<Line> {
        vec![
            line(0, 2, true, true),
            line(3, 1, false, false),
            line(4, 1, false, true),
        ]
    }

    #[test]
    fn test_linear_to_location() {
        let lines = sample();
        assert_eq!(linear_to_location(&lines, 0), Location::new(0, 0));
        assert_eq!(linear_to_location(&lines, 2), Location::new(0, 2));
        assert_eq!(linear_to_location(&lines, 3), Location::new(1, 0));
        // Soft-wrap boundary belongs to the next line.
        assert_eq!(linear_to_location(&lines, 4), Location::new(2, 0));
        assert_eq!(linear_to_location(&lines, 5), Location::new(2, 1));
        assert_eq!(linear_to_location(&lines, 99), Location::new(2, 1));
    }

    #[test]
    fn test_location_to_linear_clamps() {
        let lines = sample();
        assert_eq!(location_to_linear(&lines, Location::new(1, 0)), 3);
        assert_eq!(location_to_linear(&lines, Location::new(0, 9)), 2);
        assert_eq!(location_to_linear(&lines, Location::new(9, 0)), 4);
        assert_eq!(location_to_linear(&[], Location::new(0, 3)), 0);
    }

    #[test]
    fn test_round_trip_every_offset() {
        let lines = sample();
        for offset in 0..=text_len(&lines) {
            let loc = linear_to_location(&lines, offset);
            assert_eq!(location_to_linear(&lines, loc), offset, "offset {offset}");
        }
    }

    #[test]
    fn test_trailing_newline_line() {
        let lines = vec![line(0, 1, true, true), line(2, 0, false, true)];
        assert_eq!(linear_to_location(&lines, 1), Location::new(0, 1));
        assert_eq!(linear_to_location(&lines, 2), Location::new(1, 0));
    }
}
