//! Speed Effect Gate
//!
//! Decides when the near-top-speed effect (the "sound barrier" cone) shows
//! and where it sits. Purely cosmetic: reads the controller's flat velocity
//! and never feeds back into movement.

use glam::{Quat, Vec3};

use crate::physics::WORLD_UP;

use super::config::{EffectsConfig, MomentumConfig};
use super::orientation::look_rotation;

/// Where to draw the effect this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Tracks whether the speed effect is showing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedEffectGate {
    active: bool,
    activations: u32,
}

impl SpeedEffectGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the effect is currently showing.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// How many times the effect switched on.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Speed above which the effect shows.
    pub fn threshold(momentum: &MomentumConfig, effects: &EffectsConfig) -> f32 {
        momentum.max_run_speed - effects.speed_effect_margin
    }

    /// Update from the body's flat velocity.
    ///
    /// Returns the effect pose while active: `offset` ahead of the body along
    /// the velocity, facing along it.
    pub fn update(
        &mut self,
        position: Vec3,
        flat_velocity: Vec3,
        momentum: &MomentumConfig,
        effects: &EffectsConfig,
    ) -> Option<EffectPose> {
        let active = flat_velocity.length() > Self::threshold(momentum, effects);
        if active != self.active {
            if active {
                self.activations += 1;
            }
            log::debug!("speed effect {}", if active { "on" } else { "off" });
            self.active = active;
        }

        if !active {
            return None;
        }

        let direction = flat_velocity.normalize_or_zero();
        Some(EffectPose {
            position: position + direction * effects.speed_effect_offset,
            rotation: look_rotation(direction, WORLD_UP).unwrap_or(Quat::IDENTITY),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_below_threshold() {
        let mut gate = SpeedEffectGate::new();
        let momentum = MomentumConfig::default();
        let effects = EffectsConfig::default();
        let speed = SpeedEffectGate::threshold(&momentum, &effects) - 0.5;

        assert!(gate.update(Vec3::ZERO, Vec3::Z * speed, &momentum, &effects).is_none());
        assert!(!gate.is_active());
    }

    #[test]
    fn test_active_near_top_speed() {
        let mut gate = SpeedEffectGate::new();
        let momentum = MomentumConfig::default();
        let effects = EffectsConfig::default();
        let velocity = Vec3::Z * momentum.max_run_speed;

        let pose = gate.update(Vec3::new(1.0, 2.0, 3.0), velocity, &momentum, &effects).unwrap();
        assert!(gate.is_active());
        assert!((pose.position - Vec3::new(1.0, 2.0, 3.0 + effects.speed_effect_offset)).length() < 1e-5);
        assert!((pose.rotation * Vec3::Z - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_counts_activations() {
        let mut gate = SpeedEffectGate::new();
        let momentum = MomentumConfig::default();
        let effects = EffectsConfig::default();
        let fast = Vec3::Z * momentum.max_run_speed;

        gate.update(Vec3::ZERO, fast, &momentum, &effects);
        gate.update(Vec3::ZERO, fast, &momentum, &effects);
        gate.update(Vec3::ZERO, Vec3::Z, &momentum, &effects);
        gate.update(Vec3::ZERO, fast, &momentum, &effects);
        assert_eq!(gate.activations(), 2);
    }
}
