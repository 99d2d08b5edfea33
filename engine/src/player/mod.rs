//! Player Module
//!
//! Runner locomotion: ground probing, drive and strafe, momentum, hover,
//! jumping and orientation.
//!
//! # Components
//!
//! - [`LocomotionController`] - Fixed-tick controller tying everything together
//!   - Highest-walkable-hit ground probe with normal re-probe
//!   - Jump state machine with coyote time, queued jumps, cooldown and dive
//!   - Ride-height hover spring-damper
//! - [`LocomotionConfig`] - Tuning, loadable from JSON
//! - [`BodyState`] - Pose and velocity of the controlled body
//! - [`SpeedEffectGate`] - Near-top-speed cosmetic effect trigger

pub mod animation;
pub mod body;
pub mod config;
pub mod drive;
pub mod effects;
pub mod grounding;
pub mod hover;
pub mod jump;
pub mod locomotion;
pub mod momentum;
pub mod orientation;
pub mod timer;

pub use animation::{AnimationSink, AnimatorParam, AnimatorTrigger, NullAnimator, RecordingAnimator};
pub use body::BodyState;
pub use config::{
    ConfigError, DriveConfig, EffectsConfig, HoverConfig, JumpConfig, LocomotionConfig,
    MomentumConfig, OrientationConfig, ProbeConfig, WorldConfig,
};
pub use effects::{EffectPose, SpeedEffectGate};
pub use grounding::{GroundContact, probe_ground, select_ground_hit};
pub use jump::{JumpKind, JumpPhase, JumpState};
pub use locomotion::{LocomotionController, LocomotionState, TickReport};
pub use timer::Countdown;
