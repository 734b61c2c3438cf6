//! Backend-neutral input events.
//!
//! Widgets in this workspace never talk to a terminal library directly. Apps translate their
//! backend events into [`InputEvent`] (see `crossterm_input` behind the `crossterm` feature) and
//! feed them to `handle_event`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    /// True when a key press should be treated as text rather than a shortcut.
    pub fn is_text(&self) -> bool {
        !self.ctrl && !self.alt
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::none(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The typed character, if this is a plain (non-shortcut) character key.
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_text() => Some(c),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Paste(String),
    Mouse(MouseEvent),
}

impl InputEvent {
    pub fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    pub fn click(x: u16, y: u16) -> Self {
        Self::Mouse(MouseEvent {
            x,
            y,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: KeyModifiers::none(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Drag(MouseButton),
    Up(MouseButton),
    ScrollUp,
    ScrollDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub kind: MouseEventKind,
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    /// A left-button press is the terminal equivalent of a tap.
    pub fn is_left_click(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_char_ignores_shortcuts() {
        assert_eq!(KeyEvent::new(KeyCode::Char('7')).text_char(), Some('7'));
        let ctrl = KeyEvent::new(KeyCode::Char('o')).with_modifiers(KeyModifiers::ctrl());
        assert_eq!(ctrl.text_char(), None);
        assert_eq!(KeyEvent::new(KeyCode::Enter).text_char(), None);
    }

    #[test]
    fn click_is_left_down() {
        let InputEvent::Mouse(m) = InputEvent::click(3, 4) else {
            panic!("expected mouse event");
        };
        assert!(m.is_left_click());
        assert_eq!((m.x, m.y), (3, 4));
    }
}
