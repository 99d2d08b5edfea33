//! In-memory terrain
//!
//! A small, immutable collection of analytic surfaces implementing
//! [`TerrainQuery`]. It stands in for the engine's collision world so the
//! controller can run headless and in tests.
//!
//! Supported pieces:
//!
//! - [`TerrainShape::Plane`] - infinite plane `dot(normal, p) = offset`
//! - [`TerrainShape::Ramp`] - finite inclined rectangle pitched about the X axis
//! - [`TerrainShape::Box`] - axis-aligned block (steps, platforms)
//!
//! Sphere casts against boxes use the Minkowski-expanded box with the slab
//! ray test, then resolve the contact as the closest box point to the sphere
//! center at impact. That is exact on faces and a close approximation on
//! edges, which is all the grounding probe needs.
//!
//! A cast whose center has already sunk into a piece (below a plane or ramp
//! by no more than the cast distance, or inside a box) reports an overlap
//! at distance `0.0` on the surface it came in through.

use glam::{Quat, Vec3};

use super::collision::{
    SurfaceHit, SurfaceMask, TerrainQuery, aabb_surface_normal, ray_aabb_intersect,
};
use super::types::DIRECTION_EPSILON_SQ;

/// Geometry of one terrain piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerrainShape {
    /// Infinite plane with unit `normal`, containing points where `dot(normal, p) == offset`.
    Plane { normal: Vec3, offset: f32 },
    /// Finite inclined rectangle.
    ///
    /// `pitch` rotates the surface about +X; a positive pitch tilts the far
    /// (+Z) edge downward, i.e. a downhill ramp for a runner moving along +Z.
    Ramp {
        center: Vec3,
        pitch: f32,
        half_width: f32,
        half_length: f32,
    },
    /// Axis-aligned box.
    Box { min: Vec3, max: Vec3 },
}

impl TerrainShape {
    /// Surface frame of a ramp: (normal, along-slope tangent).
    fn ramp_frame(pitch: f32) -> (Vec3, Vec3) {
        let rotation = Quat::from_rotation_x(pitch);
        (rotation * Vec3::Y, rotation * Vec3::Z)
    }
}

/// A terrain shape tagged with its collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPiece {
    pub shape: TerrainShape,
    pub layer: SurfaceMask,
}

/// Immutable set of terrain pieces.
#[derive(Debug, Clone, Default)]
pub struct TerrainSet {
    pieces: Vec<TerrainPiece>,
}

impl TerrainSet {
    /// Create an empty terrain set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a piece on the given layer.
    pub fn push(&mut self, shape: TerrainShape, layer: SurfaceMask) -> &mut Self {
        self.pieces.push(TerrainPiece { shape, layer });
        self
    }

    /// Add a horizontal walkable plane at `height`.
    pub fn with_flat_ground(mut self, height: f32) -> Self {
        self.push(
            TerrainShape::Plane {
                normal: Vec3::Y,
                offset: height,
            },
            SurfaceMask::WALKABLE,
        );
        self
    }

    /// Add a walkable ramp.
    pub fn with_ramp(mut self, center: Vec3, pitch: f32, half_width: f32, half_length: f32) -> Self {
        self.push(
            TerrainShape::Ramp {
                center,
                pitch,
                half_width,
                half_length,
            },
            SurfaceMask::WALKABLE,
        );
        self
    }

    /// Add a walkable box.
    pub fn with_box(mut self, min: Vec3, max: Vec3) -> Self {
        self.push(TerrainShape::Box { min, max }, SurfaceMask::WALKABLE);
        self
    }

    /// All pieces in insertion order.
    pub fn pieces(&self) -> &[TerrainPiece] {
        &self.pieces
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Whether the set has no pieces.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn visible(&self, mask: SurfaceMask) -> impl Iterator<Item = &TerrainShape> {
        self.pieces
            .iter()
            .filter(move |piece| piece.layer.intersects(mask))
            .map(|piece| &piece.shape)
    }
}

/// Sweep a sphere against an oriented plane patch.
///
/// `in_bounds` decides whether a contact point lies on the finite patch.
fn sphere_cast_plane(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    normal: Vec3,
    offset: f32,
    in_bounds: impl Fn(Vec3) -> bool,
) -> Option<SurfaceHit> {
    let signed = normal.dot(origin) - offset;
    if signed < -max_distance {
        // Further below than the cast reaches: seen from the back.
        return None;
    }

    if signed <= radius {
        // Touching, or sunk below the surface: overlap at the surface point
        // under the center.
        let point = origin - normal * signed;
        return in_bounds(point).then(|| SurfaceHit::new(point, normal, 0.0));
    }

    let approach = -normal.dot(direction);
    if approach <= 1e-6 {
        return None;
    }

    let t = (signed - radius) / approach;
    if t > max_distance {
        return None;
    }

    let point = origin + direction * t - normal * radius;
    in_bounds(point).then(|| SurfaceHit::new(point, normal, t))
}

fn ray_plane(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    normal: Vec3,
    offset: f32,
    in_bounds: impl Fn(Vec3) -> bool,
) -> Option<SurfaceHit> {
    let signed = normal.dot(origin) - offset;
    let approach = -normal.dot(direction);
    if signed < 0.0 || approach <= 1e-6 {
        return None;
    }

    let t = signed / approach;
    if t > max_distance {
        return None;
    }

    let point = origin + direction * t;
    in_bounds(point).then(|| SurfaceHit::new(point, normal, t))
}

fn ramp_bounds(center: Vec3, tangent: Vec3, half_width: f32, half_length: f32) -> impl Fn(Vec3) -> bool {
    move |point: Vec3| {
        let local = point - center;
        local.x.abs() <= half_width + 1e-4 && local.dot(tangent).abs() <= half_length + 1e-4
    }
}

fn sphere_cast_box(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    min: Vec3,
    max: Vec3,
) -> Option<SurfaceHit> {
    if origin.cmpge(min).all() && origin.cmple(max).all() {
        // Center inside the box: overlap on the face the cast came in through.
        let depth = ray_aabb_intersect(origin, -direction, min, max)?;
        if depth > max_distance {
            return None;
        }
        let point = origin - direction * depth;
        return Some(SurfaceHit::new(point, aabb_surface_normal(point, min, max), 0.0));
    }

    let expanded_min = min - Vec3::splat(radius);
    let expanded_max = max + Vec3::splat(radius);

    let inside_expanded = origin.cmpge(expanded_min).all() && origin.cmple(expanded_max).all();
    let t = if inside_expanded {
        let closest = origin.clamp(min, max);
        if origin.distance_squared(closest) > radius * radius {
            // Inside the expanded box corner region but clear of the rounded shape.
            ray_aabb_intersect(origin, direction, min, max).map(|t| (t - radius).max(0.0))?
        } else {
            0.0
        }
    } else {
        ray_aabb_intersect(origin, direction, expanded_min, expanded_max)?
    };

    if t > max_distance {
        return None;
    }

    let center = origin + direction * t;
    let point = center.clamp(min, max);
    let offset = center - point;
    let normal = if offset.length_squared() > DIRECTION_EPSILON_SQ {
        offset.normalize()
    } else {
        aabb_surface_normal(point, min, max)
    };

    Some(SurfaceHit::new(point, normal, t))
}

impl TerrainQuery for TerrainSet {
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Vec<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance < 0.0 {
            return Vec::new();
        }
        let radius = radius.max(0.0);

        self.visible(mask)
            .filter_map(|shape| match *shape {
                TerrainShape::Plane { normal, offset } => {
                    sphere_cast_plane(origin, radius, direction, max_distance, normal, offset, |_| true)
                }
                TerrainShape::Ramp {
                    center,
                    pitch,
                    half_width,
                    half_length,
                } => {
                    let (normal, tangent) = TerrainShape::ramp_frame(pitch);
                    sphere_cast_plane(
                        origin,
                        radius,
                        direction,
                        max_distance,
                        normal,
                        normal.dot(center),
                        ramp_bounds(center, tangent, half_width, half_length),
                    )
                }
                TerrainShape::Box { min, max } => {
                    sphere_cast_box(origin, radius, direction, max_distance, min, max)
                }
            })
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: SurfaceMask,
    ) -> Option<SurfaceHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        self.visible(mask)
            .filter_map(|shape| match *shape {
                TerrainShape::Plane { normal, offset } => {
                    ray_plane(origin, direction, max_distance, normal, offset, |_| true)
                }
                TerrainShape::Ramp {
                    center,
                    pitch,
                    half_width,
                    half_length,
                } => {
                    let (normal, tangent) = TerrainShape::ramp_frame(pitch);
                    ray_plane(
                        origin,
                        direction,
                        max_distance,
                        normal,
                        normal.dot(center),
                        ramp_bounds(center, tangent, half_width, half_length),
                    )
                }
                TerrainShape::Box { min, max } => {
                    let t = ray_aabb_intersect(origin, direction, min, max)?;
                    (t <= max_distance).then(|| {
                        let point = origin + direction * t;
                        SurfaceHit::new(point, aabb_surface_normal(point, min, max), t)
                    })
                }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
