//! Text layout and editing engine.
//!
//! The pieces, bottom up:
//!
//! - [`StyleStore`]: default style plus per-character overrides keyed by
//!   linear offset
//! - [`break_lines`]: splits graphemes into the line array (newlines, word
//!   wrap, forced wrap)
//! - [`metrics::compute`]: positions every character and derives line
//!   heights and shared baselines
//! - [`coords`]: offset, (line, column) and point conversions
//! - [`RichTextBuffer`]: owns the document and keeps layout in sync
//! - [`History`] and [`Selection`]: the editing state on top
//! - [`segment`]: style-range import and export
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::text::RichTextBuffer;
//! use richtext_canvas::{CharStyle, Rgba};
//!
//! let mut buffer = RichTextBuffer::with_text("hello world");
//! buffer.set_range_style(6..11, &CharStyle::new().with_fill(Rgba::RED));
//!
//! // Inserting before "world" shifts its style along with it.
//! buffer.apply_text_change("hello brave world");
//! assert_eq!(buffer.style_at(12).fill_color(), Rgba::RED);
//! assert_eq!(buffer.style_at(6).fill_color(), Rgba::BLACK);
//! ```

mod buffer;
pub mod coords;
mod edit;
mod measure;
pub mod metrics;
pub mod segment;
mod selection;
mod store;
mod wrap;

pub use buffer::RichTextBuffer;
pub use coords::Location;
pub use edit::{History, Snapshot, TextChange, diff_graphemes};
pub use measure::{FontSpec, MeasuredGlyph, MonospaceMeasurer, TextMeasurer, measure_glyph};
pub use metrics::{GlyphMetrics, LineMetrics, TextMetrics};
pub use segment::{LegacyStyles, StyleRange};
pub use selection::{Selection, next_word_boundary, prev_word_boundary, word_range_at};
pub use store::{OverrideMap, StyleStore};
pub use wrap::{Line, break_lines, run_width};
