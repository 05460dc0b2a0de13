//! Keyboard event types and the editing key map.

use bitflags::bitflags;

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Alt/Option key.
        const ALT = 0b0000_0010;
        /// Control key.
        const CTRL = 0b0000_0100;
        /// Command/Meta key.
        const META = 0b0000_1000;
    }
}

/// A key code representing a keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Delete,
    /// A character key (includes space).
    Char(char),
    Esc,
}

/// Caret movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// What a key press asks the editor to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Move the caret, optionally extending the selection or jumping words.
    Move {
        direction: Direction,
        extend: bool,
        by_word: bool,
    },
    /// Jump to the start or end of the current line.
    LineEdge { end: bool, extend: bool },
    SelectAll,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    DeleteBackward { by_word: bool },
    DeleteForward { by_word: bool },
    Newline,
    Insert(char),
    /// Leave editing.
    Exit,
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys held.
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    /// Create a new key event.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Create a key event with no modifiers.
    #[must_use]
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Create a character key event.
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c))
    }

    /// Create a Ctrl+key event.
    #[must_use]
    pub fn with_ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CTRL)
    }

    /// Create a Shift+key event.
    #[must_use]
    pub fn with_shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Check if Shift is held.
    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Check if Ctrl is held.
    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(KeyModifiers::CTRL)
    }

    /// Check if Alt is held.
    #[must_use]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(KeyModifiers::ALT)
    }

    /// Ctrl or Meta: the shortcut modifier on either platform.
    #[must_use]
    pub fn primary(&self) -> bool {
        self.modifiers.intersects(KeyModifiers::CTRL | KeyModifiers::META)
    }

    /// Map the key press to an editing action.
    #[must_use]
    pub fn action(&self) -> Option<KeyAction> {
        let extend = self.shift();
        let by_word = self.ctrl() || self.alt();
        let motion = |direction| {
            Some(KeyAction::Move {
                direction,
                extend,
                by_word,
            })
        };

        match self.code {
            KeyCode::Left => motion(Direction::Left),
            KeyCode::Right => motion(Direction::Right),
            KeyCode::Up => motion(Direction::Up),
            KeyCode::Down => motion(Direction::Down),
            KeyCode::Home => Some(KeyAction::LineEdge { end: false, extend }),
            KeyCode::End => Some(KeyAction::LineEdge { end: true, extend }),
            KeyCode::Backspace => Some(KeyAction::DeleteBackward { by_word }),
            KeyCode::Delete => Some(KeyAction::DeleteForward { by_word }),
            KeyCode::Enter => Some(KeyAction::Newline),
            KeyCode::Esc => Some(KeyAction::Exit),
            KeyCode::Tab => None,
            KeyCode::Char(c) if self.primary() => match c.to_ascii_lowercase() {
                'a' => Some(KeyAction::SelectAll),
                'z' if extend => Some(KeyAction::Redo),
                'z' => Some(KeyAction::Undo),
                'y' => Some(KeyAction::Redo),
                'c' => Some(KeyAction::Copy),
                'x' => Some(KeyAction::Cut),
                'v' => Some(KeyAction::Paste),
                _ => None,
            },
            KeyCode::Char(c) if c.is_control() => None,
            KeyCode::Char(c) => Some(KeyAction::Insert(c)),
        }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_creation() {
        let event = KeyEvent::char('a');
        assert_eq!(event.code, KeyCode::Char('a'));
        assert!(event.modifiers.is_empty());
    }

    #[test]
    fn test_key_event_modifiers() {
        let event = KeyEvent::with_ctrl(KeyCode::Char('c'));
        assert!(event.ctrl());
        assert!(event.primary());
        assert!(!event.shift());
        assert_eq!(event.action(), Some(KeyAction::Copy));
    }

    #[test]
    fn test_arrow_actions() {
        let shift_left = KeyEvent::with_shift(KeyCode::Left);
        assert_eq!(
            shift_left.action(),
            Some(KeyAction::Move {
                direction: Direction::Left,
                extend: true,
                by_word: false
            })
        );
        let word_right = KeyEvent::new(KeyCode::Right, KeyModifiers::ALT);
        assert!(matches!(
            word_right.action(),
            Some(KeyAction::Move { by_word: true, .. })
        ));
    }

    #[test]
    fn test_shortcuts() {
        let redo = KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::META | KeyModifiers::SHIFT);
        assert_eq!(redo.action(), Some(KeyAction::Redo));
        assert_eq!(
            KeyEvent::with_ctrl(KeyCode::Char('z')).action(),
            Some(KeyAction::Undo)
        );
        assert_eq!(KeyEvent::with_ctrl(KeyCode::Char('q')).action(), None);
    }

    #[test]
    fn test_text_keys() {
        assert_eq!(KeyEvent::char('é').action(), Some(KeyAction::Insert('é')));
        assert_eq!(KeyEvent::char('\u{7}').action(), None);
        assert_eq!(KeyEvent::key(KeyCode::Esc).action(), Some(KeyAction::Exit));
    }
}
