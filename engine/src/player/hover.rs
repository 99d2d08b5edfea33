//! Hover
//!
//! Ride-height spring-damper that keeps the body floating above the ground
//! contact instead of resting on it. The result is a velocity change along
//! body up; horizontal velocity is never touched.

use glam::Vec3;

use super::config::HoverConfig;

/// Hover velocity change for one tick, clamped to `±max_force`.
///
/// Going over a slope with lateral velocity into the surface adds a small
/// extra term so the spring does not lag behind the terrain.
pub fn hover_force(
    position: Vec3,
    velocity: Vec3,
    contact_point: Vec3,
    ground_normal: Vec3,
    up: Vec3,
    config: &HoverConfig,
) -> f32 {
    let relative_height = (position - contact_point).dot(up);
    let vertical_speed = velocity.dot(up);
    let lateral_velocity = velocity - up * vertical_speed;

    let spring = (config.ride_height - relative_height) * config.distance_multiplier * config.spring;
    let damper = vertical_speed * config.damper;
    let slope = lateral_velocity.dot(ground_normal) * config.slope_coefficient;

    (spring - damper - slope).clamp(-config.max_force, config.max_force)
}
