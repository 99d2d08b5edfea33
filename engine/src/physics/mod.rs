//! Physics module
//!
//! Terrain queries for the locomotion controller. There is no external
//! physics library: the controller only needs shape casts and rays against
//! the ground, and the body integration is a few lines in
//! [`crate::player::body`].
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Angles in configuration files are degrees, radians in code
//!
//! # Submodules
//!
//! - [`types`] - Core mathematical types (Vec3, Quat) re-exported from glam
//! - [`collision`] - Query trait, hits, layer masks, ray-AABB slab test
//! - [`terrain`] - In-memory terrain made of planes, ramps and boxes

pub mod collision;
pub mod terrain;
pub mod types;

pub use collision::{SurfaceHit, SurfaceMask, TerrainQuery, ray_aabb_intersect, slope_angle_degrees};
pub use terrain::{TerrainPiece, TerrainSet, TerrainShape};
pub use types::{Quat, Vec3, WORLD_UP};
