//! Input events for an editing session.
//!
//! Hosts translate their native keyboard, pointer, IME and clipboard
//! events into [`EditorEvent`]s. Pointer coordinates arrive already mapped
//! into the element's local space.

mod clicks;
mod event;
mod keyboard;

pub use clicks::{ClickTracker, ClickType};
pub use event::{BlurTarget, EditorEvent, PointerEvent};
pub use keyboard::{Direction, KeyAction, KeyCode, KeyEvent, KeyModifiers};
