//! Unicode utilities for grapheme handling and display width.

mod grapheme;
mod width;

pub use grapheme::{
    GraphemeIterator, ZERO_WIDTH_SPACE, graphemes, is_newline, is_word_boundary, segment,
};
pub use width::{WidthMethod, grapheme_columns};
