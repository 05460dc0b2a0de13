//! Events an editing host forwards to a text node.

use std::time::Duration;

use crate::input::keyboard::{KeyEvent, KeyModifiers};

/// A pointer position in element-local coordinates.
///
/// The host maps screen coordinates into the element's untransformed space
/// before forwarding, flips and rotation included.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    /// Host clock reading, used for multi-click detection.
    pub time: Duration,
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    #[must_use]
    pub fn new(x: f32, y: f32, time: Duration) -> Self {
        Self {
            x,
            y,
            time,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }
}

/// Where focus went when the input proxy lost it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlurTarget {
    /// Somewhere unrelated; editing ends.
    #[default]
    Outside,
    /// A host control that edits this text (e.g. a style toolbar); editing
    /// continues and the host refocuses afterwards.
    EditorControl,
}

/// An input event.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    Key(KeyEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// IME composition began.
    CompositionStart,
    /// The in-progress composition string changed.
    CompositionUpdate(String),
    /// The composition committed this string.
    CompositionEnd(String),
    /// Clipboard text to insert.
    Paste(String),
    Blur(BlurTarget),
}

impl From<KeyEvent> for EditorEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}
