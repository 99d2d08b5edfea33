//! Ground Detection
//!
//! Sphere-casts down from the body center and picks the ground contact:
//!
//! 1. Collect *every* hit of the cast, not just the nearest.
//! 2. Reject hits whose normal is steeper than the max walkable slope.
//! 3. Keep the hit that is highest in the body's local frame. On stepped
//!    ground the broad cast sees several surfaces; the highest one is the
//!    one the runner is actually standing on.
//! 4. Re-probe the winner with a short ray to get a clean normal, since
//!    shape-cast normals are blended on edges. A re-probed normal steeper
//!    than the walkable limit is discarded in favour of the cast normal.

use glam::Vec3;

use crate::physics::{SurfaceHit, TerrainQuery, slope_angle_degrees};

use super::config::ProbeConfig;

/// Accepted ground contact for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    /// Contact point of the winning hit
    pub point: Vec3,
    /// Refined surface normal
    pub normal: Vec3,
    /// Slope of `normal` relative to body up (degrees)
    pub slope_degrees: f32,
    /// Contact height relative to the body center along body up (negative below)
    pub local_height: f32,
}

/// Pick the highest walkable hit.
///
/// `position` and `up` define the body's local frame. Hits steeper than
/// `max_slope_degrees` are ignored. Exact height ties keep the earlier hit.
pub fn select_ground_hit(
    hits: &[SurfaceHit],
    position: Vec3,
    up: Vec3,
    max_slope_degrees: f32,
) -> Option<(SurfaceHit, f32)> {
    hits.iter()
        .filter(|hit| slope_angle_degrees(hit.normal, up) <= max_slope_degrees)
        .map(|hit| (*hit, up.dot(hit.point - position)))
        .fold(None, |best: Option<(SurfaceHit, f32)>, candidate| match best {
            Some((_, best_height)) if best_height >= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Probe the terrain below the body.
///
/// Returns `None` when nothing walkable is within reach.
pub fn probe_ground(
    terrain: &dyn TerrainQuery,
    position: Vec3,
    up: Vec3,
    config: &ProbeConfig,
) -> Option<GroundContact> {
    let down = -up;
    let hits = terrain.sphere_cast_all(
        position,
        config.radius,
        down,
        config.cast_distance(),
        config.surface_mask,
    );

    let (hit, local_height) = select_ground_hit(&hits, position, up, config.max_slope_degrees)?;

    // The refinement ray can land on a wall next to an edge contact; keep
    // the cast normal then.
    let offset = config.normal_probe_offset;
    let normal = terrain
        .raycast(hit.point + up * offset, down, offset * 2.0, config.surface_mask)
        .map(|refined| refined.normal.normalize_or(up))
        .filter(|refined| slope_angle_degrees(*refined, up) <= config.max_slope_degrees)
        .unwrap_or(hit.normal)
        .normalize_or(up);

    log::trace!(
        "ground probe: {} hits, chose {:?} (height {:.3})",
        hits.len(),
        hit.point,
        local_height
    );

    Some(GroundContact {
        point: hit.point,
        normal,
        slope_degrees: slope_angle_degrees(normal, up),
        local_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SurfaceMask;

    /// Terrain with fixed cast hits and a fixed refinement normal.
    struct CannedTerrain {
        hits: Vec<SurfaceHit>,
        ray_normal: Vec3,
    }

    impl TerrainQuery for CannedTerrain {
        fn sphere_cast_all(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: SurfaceMask) -> Vec<SurfaceHit> {
            self.hits.clone()
        }

        fn raycast(&self, origin: Vec3, direction: Vec3, _: f32, _: SurfaceMask) -> Option<SurfaceHit> {
            Some(SurfaceHit::new(origin + direction * 0.1, self.ray_normal, 0.1))
        }
    }

    fn tilted(angle_degrees: f32) -> Vec3 {
        glam::Quat::from_rotation_x(angle_degrees.to_radians()) * Vec3::Y
    }

    fn hit_with_angle(angle_degrees: f32, height: f32) -> SurfaceHit {
        let normal = glam::Quat::from_rotation_x(angle_degrees.to_radians()) * Vec3::Y;
        SurfaceHit::new(Vec3::new(0.0, height, 0.0), normal, 1.0 - height)
    }

    #[test]
    fn test_no_hits() {
        assert!(select_ground_hit(&[], Vec3::ZERO, Vec3::Y, 55.0).is_none());
    }

    #[test]
    fn test_highest_walkable_hit_wins() {
        let hits = [hit_with_angle(10.0, 0.5), hit_with_angle(40.0, 0.3)];
        let (chosen, height) = select_ground_hit(&hits, Vec3::ZERO, Vec3::Y, 55.0).unwrap();
        assert_eq!(chosen, hits[0]);
        assert_eq!(height, 0.5);

        let reversed = [hits[1], hits[0]];
        let (chosen, _) = select_ground_hit(&reversed, Vec3::ZERO, Vec3::Y, 55.0).unwrap();
        assert_eq!(chosen, hits[0]);
    }

    #[test]
    fn test_steep_hit_is_rejected_even_if_higher() {
        let hits = [hit_with_angle(70.0, 0.9), hit_with_angle(5.0, 0.1)];
        let (chosen, _) = select_ground_hit(&hits, Vec3::ZERO, Vec3::Y, 55.0).unwrap();
        assert_eq!(chosen, hits[1]);
    }

    #[test]
    fn test_only_steep_hits() {
        let hits = [hit_with_angle(60.0, 0.2), hit_with_angle(80.0, 0.4)];
        assert!(select_ground_hit(&hits, Vec3::ZERO, Vec3::Y, 55.0).is_none());
    }

    #[test]
    fn test_tie_keeps_first() {
        let mut a = hit_with_angle(0.0, 0.2);
        a.point.x = 1.0;
        let b = hit_with_angle(0.0, 0.2);
        let (chosen, _) = select_ground_hit(&[a, b], Vec3::ZERO, Vec3::Y, 55.0).unwrap();
        assert_eq!(chosen, a);
    }

    #[test]
    fn test_height_is_relative_to_body() {
        let hits = [SurfaceHit::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Y, 1.0)];
        let (_, height) = select_ground_hit(&hits, Vec3::new(0.0, 4.2, 0.0), Vec3::Y, 55.0).unwrap();
        assert!((height + 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_refined_normal_replaces_cast_normal() {
        let terrain = CannedTerrain {
            hits: vec![SurfaceHit::new(Vec3::new(0.0, -1.2, 0.0), tilted(30.0), 0.8)],
            ray_normal: tilted(5.0),
        };
        let contact = probe_ground(&terrain, Vec3::ZERO, Vec3::Y, &ProbeConfig::default()).unwrap();
        assert!((contact.slope_degrees - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_steep_refined_normal_falls_back_to_cast_normal() {
        let terrain = CannedTerrain {
            hits: vec![SurfaceHit::new(Vec3::new(0.0, -1.2, 0.0), tilted(10.0), 0.8)],
            ray_normal: tilted(80.0),
        };
        let config = ProbeConfig::default();
        let contact = probe_ground(&terrain, Vec3::ZERO, Vec3::Y, &config).unwrap();
        assert!((contact.slope_degrees - 10.0).abs() < 1e-3);
        assert!(contact.slope_degrees <= config.max_slope_degrees);
    }
}
