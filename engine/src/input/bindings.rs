//! Input Bindings Module
//!
//! Maps physical keys to runner actions, with remapping support.

use std::collections::{HashMap, HashSet};

use super::KeyCode;

/// Logical runner actions that can be bound to physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Strafe left (default: A)
    StrafeLeft,
    /// Strafe right (default: D)
    StrafeRight,
    /// Vertical axis up (default: W)
    Forward,
    /// Vertical axis down (default: S)
    Back,
    /// Slide while held (default: Shift)
    Slide,
    /// Jump (default: Space)
    Jump,
    /// Downward dive while airborne (default: C)
    Dive,
}

impl InputAction {
    /// Actions that fire once per press rather than while held.
    pub fn is_edge_triggered(self) -> bool {
        matches!(self, InputAction::Jump | InputAction::Dive)
    }
}

/// Maps physical keys to logical actions.
///
/// Each key maps to at most one action and each action to at most one key.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
    action_to_key: HashMap<InputAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create bindings with the default layout.
    ///
    /// Default bindings:
    /// - A / D = StrafeLeft / StrafeRight
    /// - W / S = Forward / Back
    /// - Shift (Left) = Slide
    /// - Space = Jump
    /// - C = Dive
    pub fn new() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::A, InputAction::StrafeLeft);
        bindings.bind(KeyCode::D, InputAction::StrafeRight);
        bindings.bind(KeyCode::W, InputAction::Forward);
        bindings.bind(KeyCode::S, InputAction::Back);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Slide);
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::C, InputAction::Dive);

        bindings
    }

    /// Create bindings with nothing bound.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        }
    }

    /// Bind a physical key to a logical action.
    ///
    /// Any previous binding of either the key or the action is removed.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if let Some(old_action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&old_action);
        }
        if let Some(old_key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&old_key);
        }

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    /// Remove the binding for a specific key.
    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&action);
        }
    }

    /// Remove the binding for a specific action.
    pub fn unbind_action(&mut self, action: InputAction) {
        if let Some(key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&key);
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Get the key bound to a logical action, if any.
    pub fn get_key(&self, action: InputAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Whether the key bound to `action` is in `held_keys`.
    pub fn is_action_held(&self, action: InputAction, held_keys: &HashSet<KeyCode>) -> bool {
        self.action_to_key
            .get(&action)
            .is_some_and(|key| held_keys.contains(key))
    }

    /// Axis value in `[-1, 1]` from a negative/positive action pair.
    pub fn axis(
        &self,
        negative: InputAction,
        positive: InputAction,
        held_keys: &HashSet<KeyCode>,
    ) -> f32 {
        let mut value = 0.0;
        if self.is_action_held(positive, held_keys) {
            value += 1.0;
        }
        if self.is_action_held(negative, held_keys) {
            value -= 1.0;
        }
        value
    }
}
