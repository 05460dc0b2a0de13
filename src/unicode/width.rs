//! Column widths used by the built-in monospace measurer.

use unicode_width::UnicodeWidthStr;

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Display columns of one grapheme cluster.
///
/// Emoji presentation sequences report 2, combining sequences report the
/// width of their base. Control characters and zero-width spaces report 0.
#[must_use]
pub fn grapheme_columns(g: &str, method: WidthMethod) -> usize {
    if g.is_ascii() && g.len() == 1 {
        let b = g.as_bytes()[0];
        return usize::from((0x20..0x7f).contains(&b));
    }
    if g.chars().all(char::is_control) {
        return 0;
    }
    let width = match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(g),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(g),
    };
    // Multi-codepoint clusters can over-report; clamp to a double cell.
    width.min(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(grapheme_columns("a", WidthMethod::WcWidth), 1);
        assert_eq!(grapheme_columns(" ", WidthMethod::WcWidth), 1);
        assert_eq!(grapheme_columns("\n", WidthMethod::WcWidth), 0);
        assert_eq!(grapheme_columns("\r\n", WidthMethod::WcWidth), 0);
    }

    #[test]
    fn test_cjk_width() {
        assert_eq!(grapheme_columns("漢", WidthMethod::WcWidth), 2);
    }

    #[test]
    fn test_emoji_width() {
        assert_eq!(grapheme_columns("😀", WidthMethod::WcWidth), 2);
        assert_eq!(grapheme_columns("👨‍👩‍👧", WidthMethod::WcWidth), 2);
    }

    #[test]
    fn test_zero_width_space() {
        assert_eq!(grapheme_columns("\u{200B}", WidthMethod::WcWidth), 0);
    }

    #[test]
    fn test_width_methods() {
        // Circled digit one is ambiguous width.
        assert_eq!(grapheme_columns("①", WidthMethod::WcWidth), 1);
        assert_eq!(grapheme_columns("①", WidthMethod::Unicode), 2);
    }
}
