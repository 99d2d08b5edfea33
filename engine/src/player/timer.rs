//! Countdown Timer
//!
//! A cancellable one-shot timer advanced by the fixed tick. Replaces
//! delayed callbacks: the owner starts it, ticks it once per step and acts
//! on the tick that reports expiry. Resolution is one tick.

/// Remaining time below which a countdown counts as expired.
///
/// Absorbs float drift from summing many fixed steps.
const EXPIRY_EPSILON: f32 = 1.0e-5;

/// One-shot countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    /// Create an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer. Any pending expiry is replaced.
    pub fn start(&mut self, duration: f32) {
        self.remaining = Some(duration.max(0.0));
    }

    /// Cancel a pending expiry.
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Whether an expiry is pending.
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `dt`. Returns `true` exactly once, on the tick the timer expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        match self.remaining {
            Some(remaining) => {
                let left = remaining - dt;
                if left <= EXPIRY_EPSILON {
                    self.remaining = None;
                    true
                } else {
                    self.remaining = Some(left);
                    false
                }
            }
            None => false,
        }
    }
}
