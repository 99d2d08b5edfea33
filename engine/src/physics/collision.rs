//! Collision query primitives
//!
//! This module defines what the locomotion controller expects from the
//! terrain: a sphere cast that reports *every* surface it touches and a
//! short single-ray probe. Both are filtered by a [`SurfaceMask`].
//!
//! The slab-method ray/AABB test and the AABB face normal helper are the
//! building blocks used by [`super::terrain::TerrainSet`].
//!
//! # Example
//!
//! ```ignore
//! use dash_runner_engine::physics::collision::{ray_aabb_intersect, SurfaceMask, TerrainQuery};
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 5.0, 0.0);
//! if let Some(t) = ray_aabb_intersect(origin, Vec3::NEG_Y, Vec3::splat(-1.0), Vec3::splat(1.0)) {
//!     let hit_point = origin + Vec3::NEG_Y * t;
//! }
//!
//! let hits = terrain.sphere_cast_all(origin, 0.4, Vec3::NEG_Y, 2.0, SurfaceMask::WALKABLE);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Layer bitmask used to filter terrain queries.
///
/// Every terrain piece carries a layer; a query only sees pieces whose layer
/// intersects the query mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceMask(pub u32);

impl SurfaceMask {
    /// Matches nothing.
    pub const NONE: Self = Self(0);
    /// Ground the runner may stand on.
    pub const WALKABLE: Self = Self(1);
    /// Obstacles and decoration the probe should ignore.
    pub const OBSTACLE: Self = Self(1 << 1);
    /// Matches every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Check whether any layer bit is shared with `other`.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for SurfaceMask {
    fn default() -> Self {
        Self::WALKABLE
    }
}

impl std::ops::BitOr for SurfaceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A single surface contact returned by a terrain query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space contact point on the surface
    pub point: Vec3,
    /// Outward surface normal at the contact (normalized)
    pub normal: Vec3,
    /// Distance travelled along the query direction before contact
    pub distance: f32,
}

impl SurfaceHit {
    /// Creates a new SurfaceHit with the given parameters.
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
        }
    }
}

/// Terrain query surface consumed by the locomotion controller.
pub trait TerrainQuery {
    /// Sweep a sphere of `radius` from `origin` along `direction` (normalized)
    /// for up to `max_distance` and return every surface it touches.
    ///
    /// Surfaces already overlapping the sphere at `origin` are reported with
    /// distance `0.0`. Order is unspecified but must be deterministic.
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Vec<SurfaceHit>;

    /// Cast a ray and return the nearest surface hit, if any.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Option<SurfaceHit>;
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The slab method works by finding the intersection of the ray with each pair of
/// axis-aligned planes that make up the AABB. If the ray enters and exits the AABB
/// at valid times (t_enter < t_exit and t_exit > 0), there is an intersection.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * d.signum()
        }
    };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Computes the outward face normal for a point on an AABB surface.
///
/// Picks the face whose axis has the largest normalized coordinate.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Angle in degrees between a surface normal and an up vector.
pub fn slope_angle_degrees(normal: Vec3, up: Vec3) -> f32 {
    normal.angle_between(up).to_degrees()
}
