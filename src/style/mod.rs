//! Character styles.
//!
//! Two records describe how a character looks:
//!
//! - [`CharStyle`]: a *partial* record where every field is optional. Used
//!   for per-character overrides, for style patches passed to the editing
//!   API, and as the flattened `{start, end, ...}` payload of style ranges.
//! - [`ResolvedStyle`]: a *complete* record with every field populated. The
//!   element default is a `ResolvedStyle`; overlaying a character's override
//!   on it yields that character's effective style.
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::{CharStyle, FontWeight, ResolvedStyle, Rgba};
//!
//! let mut over = CharStyle::new().with_fill(Rgba::RED);
//! over.merge(&CharStyle::new().with_font_size(32.0));
//!
//! // Merging is field-wise: the fill survives the font-size patch.
//! let resolved = ResolvedStyle::default().overlay(&over);
//! assert_eq!(resolved.font_size, 32.0);
//! assert_eq!(resolved.fill_color(), Rgba::RED);
//! assert_eq!(resolved.font_weight, FontWeight::NORMAL);
//! ```

pub(crate) mod lenient;
mod paint;
mod units;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::text::FontSpec;

pub use paint::{
    ColorStop, Gradient, GradientKind, ImagePaint, ImageTag, Paint, Shadow, Shadows, StrokeAlign,
    StrokeCap, StrokeJoin,
};
pub use units::{FontWeight, TextCase, TextDecoration, Unit};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;
/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Partial character style. Unset fields defer to the underlying style.
///
/// Decoding drops a malformed field with a warning and keeps the rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharStyle {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub fill: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub stroke: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub stroke_align: Option<StrokeAlign>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub stroke_cap: Option<StrokeCap>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub stroke_join: Option<StrokeJoin>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub dash_pattern: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub text_case: Option<TextCase>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub letter_spacing: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub text_background_color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub shadow: Option<Shadows>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional")]
    pub inner_shadow: Option<Shadows>,
}

/// Overlay every `Some` field of `$patch` onto `$target`.
macro_rules! overlay_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

/// Copy every `Some` field of `$patch` over the same optional field of `$target`.
macro_rules! merge_options {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if $patch.$field.is_some() {
                $target.$field.clone_from(&$patch.$field);
            }
        )+
    };
}

impl CharStyle {
    /// Empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `patch` into `self`: set fields in `patch` win, everything else
    /// is preserved.
    pub fn merge(&mut self, patch: &Self) {
        merge_options!(self, patch;
            font_size,
            font_family,
            font_weight,
            fill,
            stroke,
            stroke_width,
            stroke_align,
            stroke_cap,
            stroke_join,
            dash_pattern,
            italic,
            text_case,
            text_decoration,
            letter_spacing,
            text_background_color,
            shadow,
            inner_shadow,
        );
    }

    /// Return `self` merged with `patch`.
    #[must_use]
    pub fn merged(mut self, patch: &Self) -> Self {
        self.merge(patch);
        self
    }

    #[must_use]
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    #[must_use]
    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Paint>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<Paint>, width: f32) -> Self {
        self.stroke = Some(stroke.into());
        self.stroke_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    #[must_use]
    pub fn with_text_case(mut self, case: TextCase) -> Self {
        self.text_case = Some(case);
        self
    }

    #[must_use]
    pub fn with_decoration(mut self, decoration: TextDecoration) -> Self {
        self.text_decoration = Some(decoration);
        self
    }

    #[must_use]
    pub fn with_letter_spacing(mut self, spacing: Unit) -> Self {
        self.letter_spacing = Some(spacing);
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.text_background_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(Shadows::One(shadow));
        self
    }
}

/// Fully populated character style.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub fill: Paint,
    pub stroke: Option<Paint>,
    pub stroke_width: f32,
    pub stroke_align: StrokeAlign,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub dash_pattern: Option<Vec<f32>>,
    pub italic: bool,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
    pub letter_spacing: Unit,
    pub text_background_color: Option<Rgba>,
    pub shadow: Option<Shadows>,
    pub inner_shadow: Option<Shadows>,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: FontWeight::NORMAL,
            fill: Paint::Solid(Rgba::BLACK),
            stroke: None,
            stroke_width: 1.0,
            stroke_align: StrokeAlign::Inside,
            stroke_cap: StrokeCap::None,
            stroke_join: StrokeJoin::Miter,
            dash_pattern: None,
            italic: false,
            text_case: TextCase::None,
            text_decoration: TextDecoration::empty(),
            letter_spacing: Unit::Px(0.0),
            text_background_color: None,
            shadow: None,
            inner_shadow: None,
        }
    }
}

impl ResolvedStyle {
    /// Overlay a partial style, returning the effective style.
    #[must_use]
    pub fn overlay(&self, patch: &CharStyle) -> Self {
        let mut out = self.clone();
        out.apply(patch);
        out
    }

    /// Overlay a partial style in place.
    pub fn apply(&mut self, patch: &CharStyle) {
        overlay_fields!(self, patch;
            font_size,
            font_family,
            font_weight,
            fill,
            stroke_width,
            stroke_align,
            stroke_cap,
            stroke_join,
            italic,
            text_case,
            text_decoration,
            letter_spacing,
        );
        merge_options!(self, patch;
            stroke,
            dash_pattern,
            text_background_color,
            shadow,
            inner_shadow,
        );
    }

    /// Font parameters handed to the measurement backend.
    #[must_use]
    pub fn font(&self) -> FontSpec<'_> {
        FontSpec {
            size: self.font_size,
            family: &self.font_family,
            weight: self.font_weight,
            italic: self.italic,
        }
    }

    /// Letter spacing in pixels.
    #[must_use]
    pub fn letter_spacing_px(&self) -> f32 {
        self.letter_spacing.resolve(self.font_size)
    }

    /// Fill as a flat color; non-solid paints degrade.
    #[must_use]
    pub fn fill_color(&self) -> Rgba {
        self.fill.flat_color(Rgba::BLACK)
    }

    /// The full record as a partial style with every field set.
    #[must_use]
    pub fn to_char_style(&self) -> CharStyle {
        CharStyle {
            font_size: Some(self.font_size),
            font_family: Some(self.font_family.clone()),
            font_weight: Some(self.font_weight),
            fill: Some(self.fill.clone()),
            stroke: self.stroke.clone(),
            stroke_width: Some(self.stroke_width),
            stroke_align: Some(self.stroke_align),
            stroke_cap: Some(self.stroke_cap),
            stroke_join: Some(self.stroke_join),
            dash_pattern: self.dash_pattern.clone(),
            italic: Some(self.italic),
            text_case: Some(self.text_case),
            text_decoration: Some(self.text_decoration),
            letter_spacing: Some(self.letter_spacing),
            text_background_color: self.text_background_color,
            shadow: self.shadow.clone(),
            inner_shadow: self.inner_shadow.clone(),
        }
    }
}
