//! Input events forwarded by the host to the widget.
//!
//! Handlers take events by `&mut` and call [`EventBase::accept`] when the
//! widget consumed the event, meaning the host must suppress its default
//! behaviour (moving the caret, submitting the form, following the link).

/// Common data for all widget events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, suppressing its default behaviour.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, letting the default behaviour happen.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Keys the widget distinguishes.
///
/// Everything that is not a navigation or commit key counts as an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    /// Enter on the numeric keypad.
    NumpadEnter,
    Tab,
    Escape,
    /// A printable character.
    Character(char),
    /// Any other key, by its platform key code.
    Unknown(u16),
}

impl Key {
    /// Map a legacy DOM `keyCode` to a key.
    pub fn from_key_code(code: u16) -> Self {
        match code {
            8 => Self::Backspace,
            9 => Self::Tab,
            13 => Self::Enter,
            27 => Self::Escape,
            35 => Self::End,
            36 => Self::Home,
            37 => Self::ArrowLeft,
            38 => Self::ArrowUp,
            39 => Self::ArrowRight,
            40 => Self::ArrowDown,
            46 => Self::Delete,
            108 => Self::NumpadEnter,
            other => Self::Unknown(other),
        }
    }

    /// Whether the key commits the active candidate.
    pub fn is_enter(self) -> bool {
        matches!(self, Self::Enter | Self::NumpadEnter)
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        Self::Character(ch)
    }
}

/// A key going down (`keydown`) or producing input (`keypress`).
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// Base event data.
    pub base: EventBase,
    /// The key involved.
    pub key: Key,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            base: EventBase::new(),
            key: key.into(),
        }
    }
}

/// The field's text changed (`input`), e.g. by paste or IME composition.
#[derive(Debug, Clone, Default)]
pub struct InputEvent {
    /// Base event data.
    pub base: EventBase,
}

impl InputEvent {
    /// Create a new input event.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A click on a menu row.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    /// Base event data.
    pub base: EventBase,
    /// The row under the pointer.
    pub row: usize,
}

impl MouseEvent {
    /// Create a click on `row`.
    pub fn new(row: usize) -> Self {
        Self {
            base: EventBase::new(),
            row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_and_ignore() {
        let mut event = KeyEvent::new(Key::Enter);
        assert!(!event.base.is_accepted());
        event.base.accept();
        assert!(event.base.is_accepted());
        event.base.ignore();
        assert!(!event.base.is_accepted());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_key_code(40), Key::ArrowDown);
        assert_eq!(Key::from_key_code(108), Key::NumpadEnter);
        assert_eq!(Key::from_key_code(65), Key::Unknown(65));
        assert!(Key::from_key_code(108).is_enter());
        assert!(!Key::ArrowUp.is_enter());
    }

    #[test]
    fn test_char_into_key() {
        let event = KeyEvent::new('a');
        assert_eq!(event.key, Key::Character('a'));
    }
}
