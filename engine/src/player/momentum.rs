//! Momentum
//!
//! Evolution of the target run speed. Sliding trades slope for speed,
//! running without sliding bleeds speed back toward the minimum.

use glam::Vec3;

use super::config::MomentumConfig;

/// Angle in degrees between the ground normal and the direction opposite to travel.
///
/// 90 on flat ground, above 90 going downhill, below 90 going uphill.
pub fn travel_slope_angle(ground_normal: Vec3, forward: Vec3) -> f32 {
    ground_normal.angle_between(-forward).to_degrees()
}

/// Next run speed after one grounded tick.
///
/// The result is always clamped to `[min_run_speed, max_run_speed]`.
pub fn next_run_speed(
    current: f32,
    sliding: bool,
    slope_angle_degrees: f32,
    config: &MomentumConfig,
    dt: f32,
) -> f32 {
    let delta = if sliding {
        (slope_angle_degrees - config.reference_angle_degrees) * config.slide_gain * dt
    } else {
        -config.passive_decay * dt
    };

    clamp_run_speed(current + delta, config)
}

/// Clamp a run speed into the configured range.
pub fn clamp_run_speed(speed: f32, config: &MomentumConfig) -> f32 {
    speed.clamp(config.min_run_speed, config.max_run_speed)
}
