//! Animation Sink
//!
//! The controller reports `grounded` / `sliding` state and the `jump`
//! trigger to whatever drives the character's animator.

/// Boolean animator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatorParam {
    Grounded,
    Sliding,
}

/// One-shot animator triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatorTrigger {
    Jump,
}

/// Receiver of animation state updates.
pub trait AnimationSink {
    /// Update a boolean parameter. Called every tick.
    fn set_bool(&mut self, param: AnimatorParam, value: bool);

    /// Fire a trigger.
    fn trigger(&mut self, trigger: AnimatorTrigger);
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl AnimationSink for NullAnimator {
    fn set_bool(&mut self, _param: AnimatorParam, _value: bool) {}

    fn trigger(&mut self, _trigger: AnimatorTrigger) {}
}

/// Sink that remembers the latest parameter values and counts triggers.
///
/// Used by the headless simulator and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    grounded: bool,
    sliding: bool,
    jump_triggers: u32,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value of a boolean parameter.
    pub fn get_bool(&self, param: AnimatorParam) -> bool {
        match param {
            AnimatorParam::Grounded => self.grounded,
            AnimatorParam::Sliding => self.sliding,
        }
    }

    /// How many times a trigger fired.
    pub fn trigger_count(&self, trigger: AnimatorTrigger) -> u32 {
        match trigger {
            AnimatorTrigger::Jump => self.jump_triggers,
        }
    }
}

impl AnimationSink for RecordingAnimator {
    fn set_bool(&mut self, param: AnimatorParam, value: bool) {
        match param {
            AnimatorParam::Grounded => self.grounded = value,
            AnimatorParam::Sliding => self.sliding = value,
        }
    }

    fn trigger(&mut self, trigger: AnimatorTrigger) {
        match trigger {
            AnimatorTrigger::Jump => self.jump_triggers += 1,
        }
    }
}
