//! Controlled Body
//!
//! Stand-in for the engine's rigid body. The locomotion controller reads the
//! pose, changes velocity and rotation, and never moves the position
//! directly: [`BodyState::integrate`] does that, the way the engine's physics
//! step would after the controller's fixed update.
//!
//! [`BodyState::integrate_against`] is the same step with the body's feet
//! swept against the terrain, so a fast fall stops on walkable ground
//! instead of passing through it. Walls are left to the grounding probe.

use glam::{Quat, Vec3};

use crate::physics::{TerrainQuery, WORLD_UP, slope_angle_degrees};

use super::config::ProbeConfig;

/// Pose and velocity of the controlled character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Body center in world space
    pub position: Vec3,
    /// Body rotation (local +Z is forward)
    pub rotation: Quat,
    /// Linear velocity in world space (m/s)
    pub linear_velocity: Vec3,
    /// Rotation of the cosmetic pivot mesh
    pub pivot_rotation: Quat,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl BodyState {
    /// Create a body at rest at `position`, facing +Z.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            pivot_rotation: Quat::IDENTITY,
        }
    }

    /// Body up direction.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Apply an instantaneous velocity change.
    pub fn apply_velocity_change(&mut self, delta: Vec3) {
        self.linear_velocity += delta;
    }

    /// Velocity with the world-up component removed.
    pub fn flat_velocity(&self) -> Vec3 {
        self.linear_velocity - WORLD_UP * self.linear_velocity.dot(WORLD_UP)
    }

    /// Advance the body by one physics step (semi-implicit Euler).
    ///
    /// Gravity is applied first, then the position moves with the updated velocity.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.linear_velocity -= WORLD_UP * gravity * dt;
        self.position += self.linear_velocity * dt;
    }

    /// Advance the body by one physics step, stopping on walkable ground.
    ///
    /// The feet are a sphere of `probe.radius` whose bottom sits
    /// `probe.half_height` below the center. On contact with a walkable
    /// surface the rest of the step slides along it and the velocity into
    /// it is removed.
    pub fn integrate_against(&mut self, dt: f32, gravity: f32, terrain: &dyn TerrainQuery, probe: &ProbeConfig) {
        self.linear_velocity -= WORLD_UP * gravity * dt;
        let motion = self.linear_velocity * dt;
        let length = motion.length();
        if length <= f32::EPSILON {
            return;
        }

        let direction = motion / length;
        let feet = self.position - self.up() * (probe.half_height - probe.radius);
        let contact = terrain
            .sphere_cast_all(feet, probe.radius, direction, length, probe.surface_mask)
            .into_iter()
            .filter(|hit| hit.normal.dot(direction) < -1e-6)
            .filter(|hit| slope_angle_degrees(hit.normal, WORLD_UP) <= probe.max_slope_degrees)
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        let Some(hit) = contact else {
            self.position += motion;
            return;
        };

        let travel = direction * hit.distance;
        let remaining = motion - travel;
        self.position += travel + remaining - hit.normal * remaining.dot(hit.normal);

        let into = self.linear_velocity.dot(hit.normal);
        if into < 0.0 {
            self.linear_velocity -= hit.normal * into;
        }
        log::trace!("body stopped on surface at {:?} (normal {:?})", hit.point, hit.normal);
    }
}
