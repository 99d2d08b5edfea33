//! Keyboard Input Module
//!
//! Tracks which keys are held. Press edges are reported by
//! [`KeyboardState::handle_key`] as they happen. Decoupled from any windowing system: hosts translate their key events
//! into [`KeyCode`] values.

use std::collections::HashSet;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Letters used by the runner bindings
    W,
    A,
    S,
    D,
    C,
    E,
    Q,
    X,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers and control keys
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    Escape,
    Enter,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Currently held keys.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if this event is a press edge (key was not held before).
    /// OS key repeat therefore never produces a second edge.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if pressed {
            self.held.insert(key)
        } else {
            self.held.remove(&key);
            false
        }
    }

    /// Whether `key` is currently held.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// All currently held keys.
    pub fn held_keys(&self) -> &HashSet<KeyCode> {
        &self.held
    }

    /// Whether any key is held.
    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    /// Release every key.
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_default() {
        let keyboard = KeyboardState::new();
        assert!(!keyboard.any_held());
        assert!(!keyboard.is_held(KeyCode::Space));
    }

    #[test]
    fn test_press_and_release() {
        let mut keyboard = KeyboardState::new();
        assert!(keyboard.handle_key(KeyCode::A, true));
        assert!(keyboard.is_held(KeyCode::A));

        keyboard.handle_key(KeyCode::A, false);
        assert!(!keyboard.is_held(KeyCode::A));
    }

    #[test]
    fn test_repeat_is_not_an_edge() {
        let mut keyboard = KeyboardState::new();
        assert!(keyboard.handle_key(KeyCode::Space, true));
        assert!(!keyboard.handle_key(KeyCode::Space, true));
    }

    #[test]
    fn test_release_then_press_is_a_new_edge() {
        let mut keyboard = KeyboardState::new();
        assert!(keyboard.handle_key(KeyCode::C, true));
        assert!(!keyboard.handle_key(KeyCode::C, false));
        assert!(keyboard.handle_key(KeyCode::C, true));
    }

    #[test]
    fn test_reset() {
        let mut keyboard = KeyboardState::new();
        keyboard.handle_key(KeyCode::W, true);
        keyboard.handle_key(KeyCode::D, true);
        keyboard.reset();
        assert!(!keyboard.any_held());
    }
}
