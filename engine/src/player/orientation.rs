//! Orientation Smoothing
//!
//! Turns the body to face its horizontal velocity, and tilts the cosmetic
//! pivot to follow the ground.

use glam::{Mat3, Quat, Vec3};

use crate::physics::types::DIRECTION_EPSILON_SQ;
use crate::physics::WORLD_UP;

use super::config::OrientationConfig;

/// Rotation whose local +Z points along `forward` and local +Y along `up`.
///
/// `forward` is projected onto the plane perpendicular to `up`. Returns
/// `None` when the projection vanishes.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let up = up.normalize_or_zero();
    let forward = forward - up * forward.dot(up);
    if up == Vec3::ZERO || forward.length_squared() <= DIRECTION_EPSILON_SQ {
        return None;
    }

    let forward = forward.normalize();
    let right = up.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, forward)).normalize())
}

/// Interpolation factor for one tick: `smoothing * dt` capped at 1.
pub fn smoothing_factor(smoothing: f32, dt: f32) -> f32 {
    (smoothing * dt).clamp(0.0, 1.0)
}

/// Body rotation after one tick.
///
/// Faces the flattened velocity, upright along world up. Unchanged when the
/// runner has no horizontal velocity.
pub fn smooth_body_rotation(
    current: Quat,
    velocity: Vec3,
    config: &OrientationConfig,
    dt: f32,
) -> Quat {
    match look_rotation(velocity, WORLD_UP) {
        Some(target) => current
            .slerp(target, smoothing_factor(config.turn_smoothing, dt))
            .normalize(),
        None => current,
    }
}

/// Pivot rotation after one tick.
///
/// Faces the velocity projected onto the ground plane with up along the
/// ground normal (world up when airborne).
pub fn smooth_pivot_rotation(
    current: Quat,
    velocity: Vec3,
    ground_normal: Option<Vec3>,
    config: &OrientationConfig,
    dt: f32,
) -> Quat {
    let up = ground_normal.unwrap_or(WORLD_UP);
    match look_rotation(velocity, up) {
        Some(target) => current
            .slerp(target, smoothing_factor(config.pivot_smoothing, dt))
            .normalize(),
        None => current,
    }
}
