//! Dash Runner Engine Library
//!
//! Physics-driven locomotion for an endless runner: a character that runs
//! forward on its own, strafes, slides, jumps with coyote time and buffered
//! presses, and hovers on a spring-damper above uneven terrain.
//!
//! # Modules
//!
//! - [`physics`] - Terrain query trait, hits, layer masks and an in-memory terrain
//! - [`player`] - Locomotion controller and its subsystems
//! - [`input`] - Platform-agnostic keyboard input, bindings and event dispatch
//! - [`session`] - Composition root wiring input, controller, body and terrain
//! - [`logging`] - `env_logger` setup
//!
//! # Example
//!
//! ```ignore
//! use dash_runner_engine::input::KeyCode;
//! use dash_runner_engine::physics::TerrainSet;
//! use dash_runner_engine::session::RunnerSession;
//! use glam::Vec3;
//!
//! let mut session = RunnerSession::builder()
//!     .terrain(TerrainSet::new().with_flat_ground(0.0))
//!     .spawn_at(Vec3::new(0.0, 1.2, 0.0))
//!     .build()?;
//! session.start();
//!
//! session.handle_key(KeyCode::Space, true);
//! session.update(frame_delta);
//! println!("speed: {:.1} m/s", session.flat_velocity().length());
//! ```

pub mod input;
pub mod logging;
pub mod physics;
pub mod player;
pub mod session;

// Re-export commonly used input types
pub use input::{InputManager, InputSnapshot, KeyCode};
// Re-export player types
pub use player::{BodyState, LocomotionConfig, LocomotionController};
pub use session::{RunnerSession, SessionBuilder, SetupError};
