//! Glyph measurement.
//!
//! Layout never talks to a font system directly. It asks a [`TextMeasurer`]
//! for the advance of one grapheme in one font, which lets hosts plug in
//! their canvas's measurement while tests use the deterministic
//! [`MonospaceMeasurer`].

use crate::style::{FontWeight, ResolvedStyle};
use crate::unicode::{WidthMethod, grapheme_columns, is_word_boundary};

/// Font parameters for one measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec<'a> {
    pub size: f32,
    pub family: &'a str,
    pub weight: FontWeight,
    pub italic: bool,
}

/// Text measurement collaborator.
pub trait TextMeasurer {
    /// Advance width of `grapheme` set in `font`, in pixels.
    fn measure(&self, grapheme: &str, font: &FontSpec<'_>) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &FontSpec<'_>) -> f32,
{
    fn measure(&self, grapheme: &str, font: &FontSpec<'_>) -> f32 {
        self(grapheme, font)
    }
}

/// Measures every display column as a fixed fraction of the font size.
///
/// Wide (CJK, emoji) graphemes take two columns and zero-width ones take
/// none, so the results are stable across platforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    /// Column advance as a fraction of the font size.
    pub advance_ratio: f32,
    pub method: WidthMethod,
}

impl MonospaceMeasurer {
    /// The default advance ratio (0.6 em per column).
    pub const DEFAULT_ADVANCE_RATIO: f32 = 0.6;

    #[must_use]
    pub fn new(advance_ratio: f32) -> Self {
        Self {
            advance_ratio,
            method: WidthMethod::WcWidth,
        }
    }
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ADVANCE_RATIO)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, grapheme: &str, font: &FontSpec<'_>) -> f32 {
        grapheme_columns(grapheme, self.method) as f32 * font.size * self.advance_ratio
    }
}

/// One measured character.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasuredGlyph {
    /// The grapheme after the case transform.
    pub display: String,
    /// Advance width.
    pub width: f32,
    /// Letter spacing added after this glyph when another follows.
    pub spacing: f32,
}

/// Measure one grapheme with its resolved style.
///
/// `word_start` drives title casing: it is true when the previous grapheme
/// was a word boundary, or at the start of the text.
#[must_use]
pub fn measure_glyph(
    measurer: &dyn TextMeasurer,
    grapheme: &str,
    style: &ResolvedStyle,
    word_start: bool,
) -> MeasuredGlyph {
    let display = style.text_case.apply(grapheme, word_start);
    let width = measurer.measure(&display, &style.font());
    MeasuredGlyph {
        display,
        width,
        spacing: style.letter_spacing_px(),
    }
}

/// Whether the grapheme at `index` starts a word.
#[must_use]
pub fn starts_word(graphemes: &[String], index: usize) -> bool {
    index == 0 || graphemes.get(index - 1).is_none_or(|prev| is_word_boundary(prev))
}
