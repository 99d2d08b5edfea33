//! Input Module
//!
//! Platform-agnostic input for the runner. Hosts feed key events into an
//! [`InputManager`]; the locomotion controller only ever sees a read-only
//! [`InputSnapshot`] per fixed tick.
//!
//! # Example
//!
//! ```rust,ignore
//! use dash_runner_engine::input::{InputManager, KeyCode};
//!
//! let mut input = InputManager::new();
//! let subscription = input.subscribe();
//!
//! input.handle_key(KeyCode::D, true);     // strafe right
//! input.handle_key(KeyCode::Space, true); // jump edge
//!
//! let snapshot = input.snapshot(subscription);
//! assert!(snapshot.jump_pressed);
//! ```

pub mod bindings;
pub mod dispatch;
pub mod handler;
pub mod keyboard;

// Re-export commonly used types at module level
pub use bindings::{InputAction, KeyBindings};
pub use dispatch::{InputDispatcher, InputEvent, SubscriptionId};
pub use handler::InputManager;
pub use keyboard::{KeyCode, KeyboardState};

/// Input for one fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Strafe axis in `[-1, 1]`, positive is right
    pub horizontal: f32,
    /// Forward/back axis in `[-1, 1]`
    pub vertical: f32,
    /// Slide key held
    pub slide_held: bool,
    /// Jump pressed since the previous tick
    pub jump_pressed: bool,
    /// Dive pressed since the previous tick
    pub dive_pressed: bool,
}

impl InputSnapshot {
    /// Whether the snapshot carries any input at all.
    pub fn is_idle(&self) -> bool {
        self.horizontal == 0.0
            && self.vertical == 0.0
            && !self.slide_held
            && !self.jump_pressed
            && !self.dive_pressed
    }
}
