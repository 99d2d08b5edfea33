//! Jump State Machine
//!
//! Handles the jump and its helpers:
//!
//! - **Cooldown**: after a jump, no other jump for `jump_cooldown` seconds.
//! - **Coyote time**: a jump pressed shortly after running off a ledge
//!   still fires, once per air-time.
//! - **Queued jump**: a press too late for coyote time is remembered for
//!   `coyote_time` seconds and fires on the landing tick.
//! - **Dive**: a downward burst, once per air-time.
//!
//! # State Machine
//!
//! ```text
//!            jump executes
//!   Ready  ----------------->  OnCooldown
//!     ^                            |
//!     +------ cooldown expires ----+
//! ```
//!
//! `queued` and `dive_ready` are orthogonal flags.

use glam::Vec3;

use super::config::JumpConfig;
use super::timer::Countdown;

/// Whether a new jump may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    /// A jump may execute
    #[default]
    Ready,
    /// Waiting for the cooldown timer
    OnCooldown,
}

/// How a jump was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Pressed while grounded
    Grounded,
    /// Pressed shortly after leaving the ground
    Coyote,
    /// Pressed in the air earlier, fired on landing
    Buffered,
}

/// Result of resolving one tick's jump input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpOutcome {
    /// Jump executed this tick
    pub jump: Option<JumpKind>,
    /// Press was queued for landing
    pub queued: bool,
    /// Dive executed this tick
    pub dive: bool,
}

/// Grounding facts the jump logic needs for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingFacts {
    pub grounded: bool,
    /// Grounded this tick, airborne last tick
    pub landed: bool,
    /// Seconds since the last grounded tick (0 while grounded)
    pub time_since_grounded: f32,
}

/// Jump state owned by the locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpState {
    phase: JumpPhase,
    queued: bool,
    coyote_consumed: bool,
    dive_ready: bool,
    cooldown: Countdown,
    queue_expiry: Countdown,
}

impl JumpState {
    /// Spawn state: ready, nothing queued, dive armed.
    ///
    /// No coyote window is open until the runner first touches the ground.
    pub fn new() -> Self {
        Self {
            dive_ready: true,
            coyote_consumed: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    /// Whether a jump may execute (not on cooldown).
    pub fn is_ready(&self) -> bool {
        self.phase == JumpPhase::Ready
    }

    /// Whether an airborne press is waiting for a landing.
    pub fn is_queued(&self) -> bool {
        self.queued
    }

    pub fn is_dive_ready(&self) -> bool {
        self.dive_ready
    }

    /// Advance the cooldown and queue-expiry timers.
    pub fn tick_timers(&mut self, dt: f32) {
        if self.cooldown.tick(dt) {
            self.phase = JumpPhase::Ready;
            log::debug!("jump cooldown finished");
        }
        if self.queue_expiry.tick(dt) && self.queued {
            self.queued = false;
            log::debug!("queued jump expired");
        }
    }

    /// Update grounding-dependent flags. Call after grounding, before [`Self::resolve`].
    pub fn observe_grounding(&mut self, facts: &GroundingFacts) {
        if facts.landed {
            self.dive_ready = true;
        }
        // A fresh coyote window opens once the runner stands on ground with
        // the cooldown over.
        if facts.grounded && self.is_ready() {
            self.coyote_consumed = false;
        }
    }

    /// Resolve this tick's jump and dive presses.
    ///
    /// Returns what executed; the caller applies the velocity changes with
    /// [`jump_velocity`] and [`dive_velocity_change`].
    pub fn resolve(
        &mut self,
        jump_pressed: bool,
        dive_pressed: bool,
        facts: &GroundingFacts,
        config: &JumpConfig,
    ) -> JumpOutcome {
        let mut outcome = JumpOutcome::default();

        if facts.landed && self.queued && self.is_ready() {
            self.queued = false;
            self.queue_expiry.cancel();
            self.execute(config);
            outcome.jump = Some(JumpKind::Buffered);
        } else if jump_pressed {
            let in_coyote =
                facts.time_since_grounded <= config.coyote_time && !self.coyote_consumed;

            if self.is_ready() && (facts.grounded || in_coyote) {
                self.execute(config);
                outcome.jump = Some(if facts.grounded {
                    JumpKind::Grounded
                } else {
                    JumpKind::Coyote
                });
            } else if !facts.grounded && facts.time_since_grounded > config.coyote_time {
                self.queued = true;
                self.queue_expiry.start(config.coyote_time);
                outcome.queued = true;
                log::debug!(
                    "jump queued ({:.2}s airborne)",
                    facts.time_since_grounded
                );
            }
        }

        if dive_pressed && !facts.grounded && self.dive_ready {
            self.dive_ready = false;
            outcome.dive = true;
            log::debug!("dive");
        }

        outcome
    }

    fn execute(&mut self, config: &JumpConfig) {
        self.phase = JumpPhase::OnCooldown;
        self.coyote_consumed = true;
        self.cooldown.start(config.jump_cooldown);
        log::debug!("jump (cooldown {:.2}s)", config.jump_cooldown);
    }
}

/// Velocity after a jump: the component along `up` becomes `jump_power`,
/// the rest is kept.
pub fn jump_velocity(velocity: Vec3, up: Vec3, jump_power: f32) -> Vec3 {
    velocity - up * velocity.dot(up) + up * jump_power
}

/// Velocity change applied by a dive.
pub fn dive_velocity_change(up: Vec3, dive_power: f32) -> Vec3 {
    -up * dive_power
}
