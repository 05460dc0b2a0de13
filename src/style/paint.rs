//! Paints, strokes and shadows.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// How a glyph is filled or stroked.
///
/// A plain color string deserializes to [`Paint::Solid`]; gradient and image
/// paints use the object forms of the design-tool model. The renderer only
/// paints flat colors, so non-solid paints degrade through
/// [`Paint::flat_color`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
    Image(ImagePaint),
}

impl Paint {
    /// A single color standing in for this paint.
    ///
    /// Gradients use the midpoint of their first and last stops. Images
    /// have no color of their own and yield `fallback`.
    #[must_use]
    pub fn flat_color(&self, fallback: Rgba) -> Rgba {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient(gradient) => match (gradient.stops.first(), gradient.stops.last()) {
                (Some(first), Some(last)) => first.color.lerp(last.color, 0.5),
                _ => fallback,
            },
            Self::Image(_) => fallback,
        }
    }

    /// Whether this paint is a plain color.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid(_))
    }
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Self::Solid(color)
    }
}

/// Gradient flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
}

/// One gradient stop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Gradient paint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub stops: Vec<ColorStop>,
}

/// Marker tag so image paints only match `"type": "image"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageTag {
    Image,
}

/// Image (pattern) paint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImagePaint {
    #[serde(rename = "type")]
    pub kind: ImageTag,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Where a stroke sits relative to the glyph outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeAlign {
    #[default]
    Inside,
    Center,
    Outside,
}

/// Stroke end cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeCap {
    #[default]
    None,
    Round,
    Square,
}

/// Stroke corner join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// A drop or inner shadow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: Rgba,
    #[serde(default)]
    pub blur: f32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub spread: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
}

impl Shadow {
    /// A shadow offset by `(x, y)` with the given blur.
    #[must_use]
    pub fn new(color: Rgba, x: f32, y: f32, blur: f32) -> Self {
        Self {
            color,
            blur,
            x,
            y,
            spread: 0.0,
            blend_mode: None,
        }
    }
}

/// One shadow or a stack of them, preserving the document's shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shadows {
    One(Shadow),
    Many(Vec<Shadow>),
}

impl Shadows {
    /// Iterate the shadows in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &Shadow> {
        match self {
            Self::One(shadow) => std::slice::from_ref(shadow).iter(),
            Self::Many(list) => list.iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_from_color_string() {
        let paint: Paint = serde_json::from_str(r##""#00FF00""##).unwrap();
        assert_eq!(paint, Paint::Solid(Rgba::from_rgb_u8(0, 255, 0)));
        assert!(paint.is_solid());
    }

    #[test]
    fn test_gradient_degrades_to_midpoint() {
        let paint: Paint = serde_json::from_str(
            r##"{"type":"linear","stops":[{"offset":0,"color":"#000000"},{"offset":1,"color":"#FFFFFF"}]}"##,
        )
        .unwrap();
        assert!(!paint.is_solid());
        assert_eq!(
            paint.flat_color(Rgba::RED),
            Rgba::new(128, 128, 128, 255)
        );
    }

    #[test]
    fn test_image_degrades_to_fallback() {
        let paint: Paint =
            serde_json::from_str(r#"{"type":"image","url":"tile.png"}"#).unwrap();
        assert!(matches!(paint, Paint::Image(_)));
        assert_eq!(paint.flat_color(Rgba::BLACK), Rgba::BLACK);
    }

    #[test]
    fn test_shadows_keep_shape() {
        let one: Shadows =
            serde_json::from_str(r##"{"color":"#000000","blur":4,"x":1,"y":2}"##).unwrap();
        assert_eq!(one.iter().count(), 1);
        assert!(serde_json::to_value(&one).unwrap().is_object());

        let many: Shadows = serde_json::from_str(
            r##"[{"color":"#000000"},{"color":"#FF0000","spread":2,"blendMode":"multiply"}]"##,
        )
        .unwrap();
        assert_eq!(many.iter().count(), 2);
        assert!(serde_json::to_value(&many).unwrap().is_array());
    }
}
