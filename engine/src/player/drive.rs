//! Drive & Strafe
//!
//! Velocity changes along the run direction and sideways. All functions
//! return the velocity change to apply this tick; none of them touch state.

use glam::Vec3;

use crate::physics::types::DIRECTION_EPSILON_SQ;
use crate::physics::WORLD_UP;

use super::config::DriveConfig;

/// Direction the forward drive pushes along.
///
/// While grounded the run direction is projected onto the ground plane so a
/// ramp does not turn part of the drive into pushing against the surface.
pub fn drive_direction(run_direction: Vec3, ground_normal: Option<Vec3>) -> Vec3 {
    match ground_normal {
        Some(normal) => {
            let projected = run_direction - normal * run_direction.dot(normal);
            if projected.length_squared() > DIRECTION_EPSILON_SQ {
                projected.normalize()
            } else {
                run_direction
            }
        }
        None => run_direction,
    }
}

/// Lateral axis: positive strafe input moves along it.
///
/// This is the cross product of the run direction and world up, flipped so
/// that +1 input moves right of the run direction.
pub fn strafe_axis(run_direction: Vec3) -> Vec3 {
    (-run_direction.cross(WORLD_UP)).normalize_or_zero()
}

/// Forward drive plus soft speed cap.
///
/// Pushes along `direction` with the configured acceleration. When the
/// speed along `direction` (after the push) exceeds `run_speed`, an opposing
/// push scaled by how far over the cap the runner is (clamped to the
/// configured multiplier range) is added. This slows the runner down over a
/// few ticks instead of clamping velocity.
pub fn forward_force(
    velocity: Vec3,
    direction: Vec3,
    run_speed: f32,
    config: &DriveConfig,
    dt: f32,
) -> Vec3 {
    let push = direction * config.acceleration * dt;
    let forward_speed = (velocity + push).dot(direction);

    if run_speed > 0.0 && forward_speed > run_speed {
        let multiplier = (forward_speed / run_speed)
            .clamp(config.brake_multiplier_min, config.brake_multiplier_max);
        push - direction * config.acceleration * multiplier * dt
    } else {
        push
    }
}

/// Lateral steering, decay and cap.
///
/// - Sliding ignores strafe input.
/// - With input outside the dead-zone, accelerate along `axis`.
/// - Without input, remove a fraction `strafe_damping * dt` (at most all) of
///   the lateral speed, so the sign never flips within a tick.
/// - If lateral speed (after the above) exceeds the cap, remove exactly the excess.
pub fn strafe_force(
    velocity: Vec3,
    axis: Vec3,
    input: f32,
    sliding: bool,
    config: &DriveConfig,
    dt: f32,
) -> Vec3 {
    let lateral_speed = velocity.dot(axis);
    let input = if sliding { 0.0 } else { input.clamp(-1.0, 1.0) };

    let mut change = if input.abs() > config.strafe_deadzone {
        axis * input * config.strafe_acceleration * dt
    } else {
        let fraction = (config.strafe_damping * dt).clamp(0.0, 1.0);
        -axis * lateral_speed * fraction
    };

    let new_lateral = lateral_speed + change.dot(axis);
    let excess = new_lateral.abs() - config.max_strafe_speed;
    if excess > 0.0 {
        change -= axis * excess * new_lateral.signum();
    }

    change
}
