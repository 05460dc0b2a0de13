//! Scalar style values: lengths, weights, case, and decoration.

use bitflags::bitflags;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A length that is either absolute pixels or a fraction of the font size.
///
/// Design documents write percentages as `{"type": "percent", "value": 1.5}`
/// where `value` is a fraction (1.5 = 150%). A bare number is pixels, and a
/// `"150%"` string is accepted on input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unit {
    /// Absolute pixel value.
    Px(f32),
    /// Fraction of the governing font size.
    Percent(f32),
}

impl Default for Unit {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl Unit {
    /// Resolve to pixels against a font size.
    #[must_use]
    pub fn resolve(self, font_size: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(fraction) => fraction * font_size,
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Px(px) => serializer.serialize_f32(px),
            Self::Percent(value) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "percent")?;
                map.serialize_entry("value", &value)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f32),
            Text(String),
            Object {
                #[serde(rename = "type")]
                kind: String,
                value: f32,
            },
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(px) => Ok(Self::Px(px)),
            Raw::Text(text) => {
                let text = text.trim();
                if let Some(pct) = text.strip_suffix('%') {
                    pct.trim()
                        .parse::<f32>()
                        .map(|v| Self::Percent(v / 100.0))
                        .map_err(de::Error::custom)
                } else {
                    text.trim_end_matches("px")
                        .parse::<f32>()
                        .map(Self::Px)
                        .map_err(de::Error::custom)
                }
            }
            Raw::Object { kind, value } => match kind.as_str() {
                "percent" => Ok(Self::Percent(value)),
                "px" => Ok(Self::Px(value)),
                other => Err(de::Error::custom(format!("unknown unit type `{other}`"))),
            },
        }
    }
}

/// Numeric font weight (100..=900). `normal` is 400 and `bold` is 700.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: Self = Self(100);
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
    pub const BLACK: Self = Self(900);

    /// Whether this weight renders as bold in a two-weight font.
    #[must_use]
    pub fn is_bold(self) -> bool {
        self.0 >= 600
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "thin" => Some(Self::THIN),
            "light" => Some(Self::LIGHT),
            "normal" | "regular" => Some(Self::NORMAL),
            "medium" => Some(Self::MEDIUM),
            "semibold" | "semi-bold" => Some(Self::SEMI_BOLD),
            "bold" => Some(Self::BOLD),
            "black" | "heavy" => Some(Self::BLACK),
            other => other.parse().ok().map(Self),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NORMAL => f.write_str("normal"),
            Self::BOLD => f.write_str("bold"),
            Self(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::NORMAL | Self::BOLD => serializer.collect_str(self),
            Self(n) => serializer.serialize_u16(n),
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(text) => Self::from_name(&text.trim().to_ascii_lowercase())
                .ok_or_else(|| de::Error::custom(format!("unknown font weight `{text}`"))),
        }
    }
}

/// Case transform applied before measuring and painting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextCase {
    #[default]
    None,
    Upper,
    Lower,
    /// Uppercase the first character of every word.
    Title,
}

impl TextCase {
    /// Transform one grapheme. `word_start` is true when the previous
    /// grapheme was a word boundary (or there was none).
    #[must_use]
    pub fn apply(self, grapheme: &str, word_start: bool) -> String {
        match self {
            Self::None => grapheme.to_string(),
            Self::Upper => grapheme.to_uppercase(),
            Self::Lower => grapheme.to_lowercase(),
            Self::Title if word_start => grapheme.to_uppercase(),
            Self::Title => grapheme.to_string(),
        }
    }
}

bitflags! {
    /// Decoration lines drawn with the glyph.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextDecoration: u8 {
        const UNDERLINE    = 0b001;
        const LINE_THROUGH = 0b010;
        const OVERLINE     = 0b100;
    }
}

impl TextDecoration {
    const NAMES: [(Self, &'static str); 3] = [
        (Self::UNDERLINE, "underline"),
        (Self::LINE_THROUGH, "line-through"),
        (Self::OVERLINE, "overline"),
    ];
}

impl fmt::Display for TextDecoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(" "))
    }
}

impl Serialize for TextDecoration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TextDecoration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut decoration = Self::empty();
        for word in raw.split_whitespace() {
            match word {
                "none" => {}
                "strikethrough" | "line-through" => decoration |= Self::LINE_THROUGH,
                other => {
                    let flag = Self::NAMES
                        .iter()
                        .find(|(_, name)| *name == other)
                        .map(|(flag, _)| *flag)
                        .ok_or_else(|| {
                            de::Error::custom(format!("unknown text decoration `{other}`"))
                        })?;
                    decoration |= flag;
                }
            }
        }
        Ok(decoration)
    }
}
