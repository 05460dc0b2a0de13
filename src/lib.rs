//! `richtext_canvas` - rich text element for canvas scene graphs
//!
//! A text node with per-character style overrides, line layout with
//! wrapping and justification, and a complete editing state machine:
//! caret and selection, IME composition, clipboard, and snapshot-based
//! undo/redo. Drawing is expressed as a backend-neutral display list.
//!
//! # Examples
//!
//! ```
//! use richtext_canvas::{CharStyle, FontWeight, TextNode, TextNodeOptions};
//!
//! let mut node = TextNode::new(TextNodeOptions::with_text("Hello world"));
//! node.enter_editing(None);
//! node.set_selection(6, 11);
//! node.set_selection_styles(&CharStyle::new().with_font_weight(FontWeight::BOLD));
//!
//! let json = node.to_json();
//! assert_eq!(json["styleRanges"][0]["start"], 6);
//! ```

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional color channel casts
#![allow(clippy::cast_sign_loss)] // Intentional color channel conversions
#![allow(clippy::cast_precision_loss)] // Offsets become layout coordinates
#![allow(clippy::module_name_repetitions)] // Allow style::StyleRange etc
#![allow(clippy::struct_excessive_bools)] // Paragraph sizing needs multiple flags
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::float_cmp)] // Layout tests compare exact products
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod node;
pub mod paragraph;
pub mod renderer;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use color::Rgba;
pub use config::EditorConfig;
pub use error::{Error, Result};
pub use paragraph::{
    AutoSizeAlign, Padding, ParagraphStyle, TextAlign, TextOverflow, TextWrap, VerticalAlign,
};
pub use style::{CharStyle, FontWeight, Paint, ResolvedStyle, TextCase, TextDecoration, Unit};

// Re-export the element and its collaborators
pub use input::{EditorEvent, KeyCode, KeyEvent, KeyModifiers, PointerEvent};
pub use node::{EditingCoordinator, EventResponse, TextNode, TextNodeOptions};
pub use renderer::{DisplayList, DrawCommand};
pub use text::{MonospaceMeasurer, RichTextBuffer, StyleRange, TextMeasurer};
