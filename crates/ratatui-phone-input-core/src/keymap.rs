use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// A set of keys bound to one action, plus the text shown for it in a help bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        matches_any(&self.keys, event)
    }
}

pub fn matches_any(patterns: &[KeyEvent], event: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, event))
}

/// Exact match on code and ctrl/alt. Shift is ignored for characters since terminals already
/// fold it into the character itself.
pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    if pattern.code != event.code {
        return false;
    }
    let m = (pattern.modifiers, event.modifiers);
    let shift_ok = matches!(pattern.code, KeyCode::Char(_)) || m.0.shift == m.1.shift;
    shift_ok && m.0.ctrl == m.1.ctrl && m.0.alt == m.1.alt
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::ctrl())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_modifiers() {
        let b = Binding::new("ctrl+o", "countries", vec![key_ctrl('o')]);
        assert!(b.matches(&key_ctrl('o')));
        assert!(!b.matches(&key_char('o')));
    }

    #[test]
    fn shift_only_matters_for_non_char_keys() {
        let shifted = KeyModifiers {
            shift: true,
            ..KeyModifiers::none()
        };
        assert!(key_event_matches(
            &key_char('G'),
            &key_char('G').with_modifiers(shifted)
        ));
        assert!(!key_event_matches(
            &key(KeyCode::Tab),
            &key(KeyCode::Tab).with_modifiers(shifted)
        ));
    }
}
