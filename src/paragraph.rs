//! Element-wide paragraph formatting and sizing.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::style::{Unit, lenient};

/// Horizontal alignment of each line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Distribute leftover width, except on a paragraph's last line.
    Justify,
    JustifyLetter,
    /// Distribute leftover width on every line, including the last.
    Both,
    BothLetter,
}

impl TextAlign {
    /// Whether this alignment stretches inter-character gaps.
    #[must_use]
    pub fn is_justified(self) -> bool {
        matches!(
            self,
            Self::Justify | Self::JustifyLetter | Self::Both | Self::BothLetter
        )
    }

    /// Whether justification also applies to a paragraph's final line.
    #[must_use]
    pub fn justifies_last_line(self) -> bool {
        matches!(self, Self::Both | Self::BothLetter)
    }
}

/// Vertical placement of the line block inside a fixed height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Wrapping mode for fixed-width elements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextWrap {
    /// Break at word boundaries, falling back to a forced break.
    #[default]
    Normal,
    /// Only explicit newlines break lines.
    None,
    /// Break before whichever character overflows, even mid-word.
    Break,
}

/// What happens to lines that do not fit a fixed height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextOverflow {
    #[default]
    Show,
    Hide,
    /// Hide overflowing lines and end the last visible one with this string.
    Ellipsis(String),
}

impl Serialize for TextOverflow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Show => serializer.serialize_str("show"),
            Self::Hide => serializer.serialize_str("hide"),
            Self::Ellipsis(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for TextOverflow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "show" => Self::Show,
            "hide" | "" => Self::Hide,
            _ => Self::Ellipsis(raw),
        })
    }
}

/// Which edge stays put when auto width changes the element width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoSizeAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Box padding, CSS order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Padding from `[top, right, bottom, left]`.
    #[must_use]
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Left plus right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Expand a CSS shorthand list (1 to 4 values).
    fn from_shorthand(values: &[f32]) -> Option<Self> {
        match *values {
            [all] => Some(Self::uniform(all)),
            [v, h] => Some(Self::new(v, h, v, h)),
            [t, h, b] => Some(Self::new(t, h, b, h)),
            [t, r, b, l] => Some(Self::new(t, r, b, l)),
            _ => None,
        }
    }
}

impl Serialize for Padding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Self {
            top,
            right,
            bottom,
            left,
        } = *self;
        #[allow(clippy::float_cmp)]
        let uniform = top == right && right == bottom && bottom == left;
        if uniform {
            serializer.serialize_f32(top)
        } else {
            [top, right, bottom, left].serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Padding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Scalar(f32),
            List(Vec<f32>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Scalar(value) => Ok(Self::uniform(value)),
            Raw::List(values) => Self::from_shorthand(&values).ok_or_else(|| {
                de::Error::custom(format!("padding takes 1 to 4 values, got {}", values.len()))
            }),
        }
    }
}

/// Default line height: 150% of the line's largest font size.
pub const DEFAULT_LINE_HEIGHT: Unit = Unit::Percent(1.5);

/// Paragraph formatting plus the element's sizing mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphStyle {
    pub line_height: Unit,
    #[serde(deserialize_with = "lenient::or_default")]
    pub text_align: TextAlign,
    #[serde(deserialize_with = "lenient::or_default")]
    pub vertical_align: VerticalAlign,
    pub padding: Padding,
    pub para_indent: f32,
    pub para_spacing: f32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub text_wrap: TextWrap,
    pub text_overflow: TextOverflow,
    #[serde(deserialize_with = "lenient::or_default")]
    pub auto_size_align: AutoSizeAlign,
    pub auto_width: bool,
    pub auto_height: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            padding: Padding::default(),
            para_indent: 0.0,
            para_spacing: 0.0,
            text_wrap: TextWrap::Normal,
            text_overflow: TextOverflow::Show,
            auto_size_align: AutoSizeAlign::Left,
            auto_width: true,
            auto_height: true,
            width: None,
            height: None,
        }
    }
}

impl ParagraphStyle {
    /// Line height in pixels for a line whose largest font is `max_font_size`.
    #[must_use]
    pub fn line_height_px(&self, max_font_size: f32) -> f32 {
        self.line_height.resolve(max_font_size)
    }

    /// Width available to line content, if the element has a fixed width.
    #[must_use]
    pub fn content_width(&self) -> Option<f32> {
        if self.auto_width {
            return None;
        }
        self.width
            .filter(|w| *w > 0.0)
            .map(|w| (w - self.padding.horizontal()).max(0.0))
    }

    /// Height available to line content, if the element has a fixed height.
    #[must_use]
    pub fn content_height(&self) -> Option<f32> {
        if self.auto_height {
            return None;
        }
        self.height.map(|h| (h - self.padding.vertical()).max(0.0))
    }

    /// Whether lines wrap against a width at all.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.text_wrap != TextWrap::None && self.content_width().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_shorthand() {
        let p: Padding = serde_json::from_str("8").unwrap();
        assert_eq!(p, Padding::uniform(8.0));
        let p: Padding = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(p, Padding::new(1.0, 2.0, 3.0, 4.0));
        let p: Padding = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(p, Padding::new(1.0, 2.0, 1.0, 2.0));
        assert!(serde_json::from_str::<Padding>("[1, 2, 3, 4, 5]").is_err());
        assert!((p.horizontal() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_padding_serializes_compactly() {
        assert_eq!(serde_json::to_string(&Padding::uniform(4.0)).unwrap(), "4.0");
        assert_eq!(
            serde_json::to_value(Padding::new(1.0, 2.0, 3.0, 4.0)).unwrap(),
            serde_json::json!([1.0, 2.0, 3.0, 4.0])
        );
    }

    #[test]
    fn test_overflow_strings() {
        let hide: TextOverflow = serde_json::from_str(r#""hide""#).unwrap();
        assert_eq!(hide, TextOverflow::Hide);
        let ellipsis: TextOverflow = serde_json::from_str(r#""...""#).unwrap();
        assert_eq!(ellipsis, TextOverflow::Ellipsis("...".into()));
        assert_eq!(serde_json::to_string(&ellipsis).unwrap(), r#""...""#);
    }

    #[test]
    fn test_text_align_names() {
        let align: TextAlign = serde_json::from_str(r#""justify-letter""#).unwrap();
        assert_eq!(align, TextAlign::JustifyLetter);
        assert!(align.is_justified());
        assert!(!align.justifies_last_line());
        assert!(TextAlign::BothLetter.justifies_last_line());
        assert!(!TextAlign::Center.is_justified());
    }

    #[test]
    fn test_content_width() {
        let mut para = ParagraphStyle {
            auto_width: false,
            width: Some(300.0),
            padding: Padding::new(0.0, 10.0, 0.0, 10.0),
            ..ParagraphStyle::default()
        };
        assert_eq!(para.content_width(), Some(280.0));
        assert!(para.wraps());
        para.text_wrap = TextWrap::None;
        assert!(!para.wraps());
        para.auto_width = true;
        assert_eq!(para.content_width(), None);
    }

    #[test]
    fn test_line_height_px() {
        let para = ParagraphStyle::default();
        assert!((para.line_height_px(48.0) - 72.0).abs() < 1e-4);
        let fixed = ParagraphStyle {
            line_height: Unit::Px(20.0),
            ..ParagraphStyle::default()
        };
        assert!((fixed.line_height_px(48.0) - 20.0).abs() < f32::EPSILON);
    }
}
