//! Physics type re-exports from glam
//!
//! The locomotion code works in glam's `f32` types throughout. World up is
//! +Y and the runner travels along +Z by default.

pub use glam::{Mat3, Quat, Vec3};

/// World up direction.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Squared length below which a direction is treated as zero.
pub const DIRECTION_EPSILON_SQ: f32 = 1.0e-8;
