//! RGBA color type used by fills, strokes, shadows and highlights.
//!
//! Colors are stored as 8-bit channels so that a color parsed from a
//! document round-trips through export byte-for-byte. Parsing accepts the
//! forms design-tool documents use:
//!
//! - hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - functional: `rgb(255, 0, 0)`, `rgba(255, 0, 0, 0.5)`
//! - a small set of CSS names (`black`, `white`, `red`, `transparent`, ...)
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::Rgba;
//!
//! let red = Rgba::parse("#ff0000").unwrap();
//! assert_eq!(red, Rgba::RED);
//! assert_eq!(red.to_string(), "#FF0000");
//!
//! let translucent = Rgba::parse("rgba(0, 0, 255, 0.5)").unwrap();
//! assert_eq!(translucent.to_string(), "#0000FF80");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// RGBA color with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 128, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);

    /// Create a color from 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit RGB channels.
    #[must_use]
    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a hex color string (with or without `#`).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self::from_rgb_u8(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::from_rgb_u8(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Parse any supported color notation.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.starts_with('#') {
            return Self::from_hex(input);
        }
        let lower = input.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_functional(args);
        }
        Self::named(&lower).or_else(|| Self::from_hex(input))
    }

    fn parse_functional(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let alpha = match parts.get(3) {
            Some(s) => (s.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        Some(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    fn named(name: &str) -> Option<Self> {
        Some(match name {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "gray" | "grey" => Self::from_rgb_u8(128, 128, 128),
            "yellow" => Self::from_rgb_u8(255, 255, 0),
            "orange" => Self::from_rgb_u8(255, 165, 0),
            "purple" => Self::from_rgb_u8(128, 0, 128),
            _ => return None,
        })
    }

    /// Return the color with a new alpha in `[0.0, 1.0]`.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Alpha as a fraction.
    #[must_use]
    pub fn alpha(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Check if fully transparent.
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Linear interpolation between colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { r, g, b, a } = *self;
        if a == 255 {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#FF0000"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("f00"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
        assert_eq!(Rgba::from_hex("#f008"), Some(Rgba::new(255, 0, 0, 136)));
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn test_from_hex_non_ascii_does_not_panic() {
        assert_eq!(Rgba::from_hex("#é00"), None);
        assert_eq!(Rgba::from_hex("ééé"), None);
    }

    #[test]
    fn test_parse_functional_and_named() {
        assert_eq!(Rgba::parse("rgb(0, 0, 255)"), Some(Rgba::BLUE));
        assert_eq!(
            Rgba::parse("RGBA(255, 255, 255, 0)"),
            Some(Rgba::new(255, 255, 255, 0))
        );
        assert_eq!(Rgba::parse("red"), Some(Rgba::RED));
        assert_eq!(Rgba::parse("  Black "), Some(Rgba::BLACK));
        assert_eq!(Rgba::parse("rgb(1,2)"), None);
        assert_eq!(Rgba::parse("chartreuse-ish"), None);
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["#000000", "#FFFFFF", "#12AB34", "#12AB3480"] {
            let color = Rgba::from_hex(input).unwrap();
            assert_eq!(color.to_string(), input);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Rgba::RED).unwrap();
        assert_eq!(json, "\"#FF0000\"");
        let back: Rgba = serde_json::from_str("\"rgb(255,0,0)\"").unwrap();
        assert_eq!(back, Rgba::RED);
        assert!(serde_json::from_str::<Rgba>("\"nope\"").is_err());
    }

    #[test]
    fn test_lerp_and_alpha() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::new(128, 128, 128, 255));
        assert_eq!(Rgba::RED.with_alpha(0.0).a, 0);
        assert!(Rgba::TRANSPARENT.is_transparent());
        assert!((Rgba::WHITE.alpha() - 1.0).abs() < f32::EPSILON);
    }
}
