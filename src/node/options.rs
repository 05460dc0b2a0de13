//! Construction options and the JSON document form of a text node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::paragraph::ParagraphStyle;
use crate::style::CharStyle;
use crate::text::StyleRange;

/// Everything a text node can be constructed from.
///
/// The default character style and the paragraph style are flattened into
/// the top level, matching the document format:
///
/// ```
/// use richtext_canvas::node::TextNodeOptions;
///
/// let options = TextNodeOptions::from_json(serde_json::json!({
///     "text": "Hello",
///     "fontSize": 24,
///     "textAlign": "center",
///     "styleRanges": [{"start": 0, "end": 1, "fontWeight": "bold"}]
/// }))
/// .unwrap();
/// assert_eq!(options.style.font_size, Some(24.0));
/// assert_eq!(options.style_ranges.as_ref().map(Vec::len), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextNodeOptions {
    pub text: String,
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub style: CharStyle,
    #[serde(flatten)]
    pub paragraph: ParagraphStyle,
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_color: Option<Rgba>,
    /// Overrides as ranges. Preferred over `styles` when both are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_ranges: Option<Vec<StyleRange>>,
    /// Legacy nested `{line: {column: style}}` overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
}

impl Default for TextNodeOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            x: 0.0,
            y: 0.0,
            style: CharStyle::default(),
            paragraph: ParagraphStyle::default(),
            editable: true,
            cursor_color: None,
            cursor_width: None,
            selection_color: None,
            style_ranges: None,
            styles: None,
        }
    }
}

impl TextNodeOptions {
    /// Options for plain text.
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: CharStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_paragraph(mut self, paragraph: ParagraphStyle) -> Self {
        self.paragraph = paragraph;
        self
    }

    #[must_use]
    pub fn with_style_ranges(mut self, ranges: Vec<StyleRange>) -> Self {
        self.style_ranges = Some(ranges);
        self
    }

    /// Fixed width with auto width off.
    #[must_use]
    pub fn with_fixed_width(mut self, width: f32) -> Self {
        self.paragraph.auto_width = false;
        self.paragraph.width = Some(width);
        self
    }

    /// Decode options from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] when the value is not an object,
    /// when `styleRanges` is not an array, or when a size is negative or
    /// not finite; [`Error::Json`] when a non-style field has the wrong
    /// shape. Malformed style fields are dropped with a warning.
    pub fn from_json(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::InvalidOptions("node json must be an object".into()));
        };
        if object
            .get("styleRanges")
            .is_some_and(|ranges| !ranges.is_array() && !ranges.is_null())
        {
            return Err(Error::InvalidOptions("styleRanges must be an array".into()));
        }
        let options: Self = serde_json::from_value(value)?;
        options.validate()?;
        Ok(options)
    }

    /// Decode options from JSON text.
    ///
    /// # Errors
    ///
    /// See [`Self::from_json`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(json)?)
    }

    /// Check sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("width", self.paragraph.width),
            ("height", self.paragraph.height),
            ("fontSize", self.style.font_size),
            ("cursorWidth", self.cursor_width),
        ];
        for (name, value) in sizes {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidOptions(format!("{name} must be a non-negative number, got {v}")));
                }
            }
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(Error::InvalidOptions("position must be finite".into()));
        }
        Ok(())
    }
}
