//! Input Handler
//!
//! Centralized input handling for the runner. Owns the keyboard state, the
//! bindings and the event dispatcher, and turns them into one
//! [`InputSnapshot`] per fixed tick.

use super::bindings::{InputAction, KeyBindings};
use super::dispatch::{InputDispatcher, InputEvent, SubscriptionId};
use super::keyboard::{KeyCode, KeyboardState};
use super::InputSnapshot;

/// Input service owned by the session.
#[derive(Debug, Default)]
pub struct InputManager {
    keyboard: KeyboardState,
    bindings: KeyBindings,
    dispatcher: InputDispatcher,
}

impl InputManager {
    /// Create an input manager with the default bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input manager with custom bindings.
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Handle a key event from the host.
    ///
    /// Press edges of edge-triggered actions (jump, dive) are published to
    /// every subscriber; held actions are read from the keyboard state when
    /// the snapshot is taken.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !self.keyboard.handle_key(key, pressed) {
            return;
        }

        if let Some(action) = self.bindings.get_action(key).filter(|a| a.is_edge_triggered()) {
            self.dispatcher.publish(InputEvent::Pressed(action));
        }
    }

    /// Press and release `key` within the same frame.
    pub fn tap(&mut self, key: KeyCode) {
        self.handle_key(key, true);
        self.handle_key(key, false);
    }

    pub fn subscribe(&mut self) -> SubscriptionId {
        self.dispatcher.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Build the input snapshot for one fixed tick.
    ///
    /// Drains the subscriber's queued edges, so each press shows up in
    /// exactly one snapshot.
    pub fn snapshot(&mut self, subscription: SubscriptionId) -> InputSnapshot {
        let held = self.keyboard.held_keys();
        let mut snapshot = InputSnapshot {
            horizontal: self
                .bindings
                .axis(InputAction::StrafeLeft, InputAction::StrafeRight, held),
            vertical: self.bindings.axis(InputAction::Back, InputAction::Forward, held),
            slide_held: self.bindings.is_action_held(InputAction::Slide, held),
            jump_pressed: false,
            dive_pressed: false,
        };

        for event in self.dispatcher.drain(subscription) {
            match event {
                InputEvent::Pressed(InputAction::Jump) => snapshot.jump_pressed = true,
                InputEvent::Pressed(InputAction::Dive) => snapshot.dive_pressed = true,
                InputEvent::Pressed(_) => {}
            }
        }

        snapshot
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Mutable bindings, for remapping at runtime.
    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }
}
