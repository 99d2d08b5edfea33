//! Locomotion Configuration
//!
//! All tuning values for the runner in one place, grouped by subsystem.
//! `Default` returns the tuned values used by the prototype; a JSON file
//! only needs to name the fields it overrides.
//!
//! ```json
//! { "jump": { "coyote_time": 0.2 }, "momentum": { "max_run_speed": 50.0 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::SurfaceMask;

/// Errors produced while loading or validating a [`LocomotionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Downward ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Radius of the probe sphere (meters)
    pub radius: f32,
    /// Half of the body height; the cast starts at the body center
    pub half_height: f32,
    /// Extra cast length below the half height (meters)
    pub clearance: f32,
    /// Steepest surface still considered ground (degrees from up)
    pub max_slope_degrees: f32,
    /// Layers the probe may ground on
    pub surface_mask: SurfaceMask,
    /// Height above the contact point where the normal re-probe ray starts
    pub normal_probe_offset: f32,
}

impl ProbeConfig {
    /// Total sphere-cast distance.
    pub fn cast_distance(&self) -> f32 {
        self.half_height + self.clearance
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            half_height: 1.0,
            clearance: 0.5,
            max_slope_degrees: 55.0,
            surface_mask: SurfaceMask::WALKABLE,
            normal_probe_offset: 0.1,
        }
    }
}

/// Forward drive and lateral strafing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Fixed world direction the runner travels in (horizontal)
    pub run_direction: Vec3,
    /// Forward drive acceleration (m/s²)
    pub acceleration: f32,
    /// Lower bound of the over-speed brake multiplier
    pub brake_multiplier_min: f32,
    /// Upper bound of the over-speed brake multiplier
    pub brake_multiplier_max: f32,
    /// Lateral acceleration at full strafe input (m/s²)
    pub strafe_acceleration: f32,
    /// Lateral speed cap (m/s)
    pub max_strafe_speed: f32,
    /// Exponential lateral decay rate with no strafe input (1/s)
    pub strafe_damping: f32,
    /// Strafe input magnitude treated as "no input"
    pub strafe_deadzone: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            run_direction: Vec3::Z,
            acceleration: 30.0,
            brake_multiplier_min: 1.0,
            brake_multiplier_max: 4.0,
            strafe_acceleration: 60.0,
            max_strafe_speed: 6.0,
            strafe_damping: 8.0,
            strafe_deadzone: 0.05,
        }
    }
}

/// Run-speed evolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub min_run_speed: f32,
    pub max_run_speed: f32,
    /// Run speed lost per second while grounded and not sliding
    pub passive_decay: f32,
    /// Run speed gained per second per degree of slope while sliding
    pub slide_gain: f32,
    /// Slope angle (degrees) at which sliding neither gains nor loses speed
    pub reference_angle_degrees: f32,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            min_run_speed: 12.0,
            max_run_speed: 40.0,
            passive_decay: 1.5,
            slide_gain: 0.4,
            reference_angle_degrees: 90.0,
        }
    }
}

/// Jump, coyote time and the downward dive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Vertical velocity set by a jump (m/s)
    pub jump_power: f32,
    /// Seconds before another jump is allowed
    pub jump_cooldown: f32,
    /// Grace window after leaving ground, also the queued-jump lifetime (seconds)
    pub coyote_time: f32,
    /// Downward velocity change of the dive (m/s)
    pub dive_power: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_power: 9.0,
            jump_cooldown: 0.3,
            coyote_time: 0.15,
            dive_power: 18.0,
        }
    }
}

/// Ride-height spring-damper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Target distance between body center and ground contact (meters)
    pub ride_height: f32,
    pub spring: f32,
    pub damper: f32,
    pub distance_multiplier: f32,
    pub slope_coefficient: f32,
    /// Largest velocity change the hover may apply in one tick (m/s)
    pub max_force: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            ride_height: 1.2,
            spring: 2.0,
            damper: 0.4,
            distance_multiplier: 1.0,
            slope_coefficient: 0.1,
            max_force: 2.0,
        }
    }
}

/// Facing and cosmetic tilt smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    pub turn_smoothing: f32,
    pub pivot_smoothing: f32,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            turn_smoothing: 10.0,
            pivot_smoothing: 4.0,
        }
    }
}

/// Speed-gated cosmetic effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Effect shows once flat speed exceeds `max_run_speed - speed_effect_margin`
    pub speed_effect_margin: f32,
    /// Distance ahead of the body where the effect is placed (meters)
    pub speed_effect_offset: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            speed_effect_margin: 1.0,
            speed_effect_offset: 2.0,
        }
    }
}

/// Simulation step and gravity applied by the body integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Gravity magnitude (m/s², positive = downward pull)
    pub gravity: f32,
    /// Fixed tick length (seconds)
    pub fixed_timestep: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            fixed_timestep: 0.02,
        }
    }
}

/// Complete locomotion tuning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub probe: ProbeConfig,
    pub drive: DriveConfig,
    pub momentum: MomentumConfig,
    pub jump: JumpConfig,
    pub hover: HoverConfig,
    pub orientation: OrientationConfig,
    pub effects: EffectsConfig,
    pub world: WorldConfig,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if require_finite(field, value)? > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if require_finite(field, value)? >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

impl LocomotionConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    /// The result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded locomotion config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Normalized horizontal run direction.
    ///
    /// Only meaningful on a validated config.
    pub fn run_direction(&self) -> Vec3 {
        Vec3::new(self.drive.run_direction.x, 0.0, self.drive.run_direction.z).normalize_or(Vec3::Z)
    }

    /// Check every value for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probe = &self.probe;
        require_positive("probe.radius", probe.radius)?;
        require_positive("probe.half_height", probe.half_height)?;
        require_non_negative("probe.clearance", probe.clearance)?;
        require_positive("probe.normal_probe_offset", probe.normal_probe_offset)?;
        let slope = require_finite("probe.max_slope_degrees", probe.max_slope_degrees)?;
        if !(0.0..90.0).contains(&slope) {
            return Err(invalid("probe.max_slope_degrees", format!("must be in [0, 90), got {slope}")));
        }
        if probe.surface_mask == SurfaceMask::NONE {
            return Err(invalid("probe.surface_mask", "must select at least one layer"));
        }

        let drive = &self.drive;
        if !drive.run_direction.is_finite() {
            return Err(invalid("drive.run_direction", "must be finite"));
        }
        let flat = Vec3::new(drive.run_direction.x, 0.0, drive.run_direction.z);
        if flat.length_squared() < 1e-6 {
            return Err(invalid("drive.run_direction", "must have a horizontal component"));
        }
        require_non_negative("drive.acceleration", drive.acceleration)?;
        require_non_negative("drive.brake_multiplier_min", drive.brake_multiplier_min)?;
        require_non_negative("drive.brake_multiplier_max", drive.brake_multiplier_max)?;
        if drive.brake_multiplier_min > drive.brake_multiplier_max {
            return Err(invalid(
                "drive.brake_multiplier_min",
                "must not exceed drive.brake_multiplier_max",
            ));
        }
        require_non_negative("drive.strafe_acceleration", drive.strafe_acceleration)?;
        require_non_negative("drive.max_strafe_speed", drive.max_strafe_speed)?;
        require_non_negative("drive.strafe_damping", drive.strafe_damping)?;
        require_non_negative("drive.strafe_deadzone", drive.strafe_deadzone)?;

        let momentum = &self.momentum;
        require_positive("momentum.min_run_speed", momentum.min_run_speed)?;
        require_positive("momentum.max_run_speed", momentum.max_run_speed)?;
        if momentum.min_run_speed > momentum.max_run_speed {
            return Err(invalid(
                "momentum.min_run_speed",
                "must not exceed momentum.max_run_speed",
            ));
        }
        require_non_negative("momentum.passive_decay", momentum.passive_decay)?;
        require_finite("momentum.slide_gain", momentum.slide_gain)?;
        require_finite("momentum.reference_angle_degrees", momentum.reference_angle_degrees)?;

        let jump = &self.jump;
        require_non_negative("jump.jump_power", jump.jump_power)?;
        require_non_negative("jump.jump_cooldown", jump.jump_cooldown)?;
        require_non_negative("jump.coyote_time", jump.coyote_time)?;
        require_non_negative("jump.dive_power", jump.dive_power)?;

        let hover = &self.hover;
        require_positive("hover.ride_height", hover.ride_height)?;
        require_non_negative("hover.spring", hover.spring)?;
        require_non_negative("hover.damper", hover.damper)?;
        require_non_negative("hover.distance_multiplier", hover.distance_multiplier)?;
        require_finite("hover.slope_coefficient", hover.slope_coefficient)?;
        require_non_negative("hover.max_force", hover.max_force)?;

        require_non_negative("orientation.turn_smoothing", self.orientation.turn_smoothing)?;
        require_non_negative("orientation.pivot_smoothing", self.orientation.pivot_smoothing)?;

        require_non_negative("effects.speed_effect_margin", self.effects.speed_effect_margin)?;
        require_finite("effects.speed_effect_offset", self.effects.speed_effect_offset)?;

        require_non_negative("world.gravity", self.world.gravity)?;
        require_positive("world.fixed_timestep", self.world.fixed_timestep)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LocomotionConfig::from_json_str(r#"{ "jump": { "coyote_time": 0.2 } }"#).unwrap();
        assert_eq!(config.jump.coyote_time, 0.2);
        assert_eq!(config.jump.jump_power, JumpConfig::default().jump_power);
        assert_eq!(config.hover, HoverConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = LocomotionConfig::default();
        config.drive.run_direction = Vec3::new(1.0, 0.0, 1.0);
        config.probe.surface_mask = SurfaceMask::WALKABLE | SurfaceMask::OBSTACLE;

        let json = config.to_json_string().unwrap();
        let parsed = LocomotionConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_min_above_max_run_speed_rejected() {
        let err = LocomotionConfig::from_json_str(
            r#"{ "momentum": { "min_run_speed": 50.0, "max_run_speed": 10.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "momentum.min_run_speed", .. }));
    }

    #[test]
    fn test_vertical_run_direction_rejected() {
        let mut config = LocomotionConfig::default();
        config.drive.run_direction = Vec3::Y;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "drive.run_direction", .. })
        ));
    }

    #[test]
    fn test_steep_max_slope_rejected() {
        let mut config = LocomotionConfig::default();
        config.probe.max_slope_degrees = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut config = LocomotionConfig::default();
        config.hover.spring = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "hover.spring", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = LocomotionConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = LocomotionConfig::load("/definitely/not/here/locomotion.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_run_direction_is_flattened() {
        let mut config = LocomotionConfig::default();
        config.drive.run_direction = Vec3::new(0.0, 0.5, 2.0);
        assert_eq!(config.run_direction(), Vec3::Z);
    }
}
