//! Locomotion Controller
//!
//! Physics-driven runner movement. Each fixed tick, in order:
//!
//! 1. Advance the jump cooldown and queued-jump timers
//! 2. Probe the ground (multi-hit sphere cast, highest walkable hit wins)
//! 3. Update slide state
//! 4. Forward drive with soft speed cap, then strafe
//! 5. Hover spring-damper (grounded and jump ready only)
//! 6. Run-speed evolution (grounded only)
//! 7. Jump, buffered jump and dive
//! 8. Orientation smoothing
//! 9. Animator updates
//!
//! The controller writes velocity and rotation only. Position is moved by
//! the body's own integration step afterwards.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dash_runner_engine::player::{BodyState, LocomotionController, NullAnimator};
//! use dash_runner_engine::physics::TerrainSet;
//! use dash_runner_engine::input::InputSnapshot;
//!
//! let terrain = TerrainSet::new().with_flat_ground(0.0);
//! let mut controller = LocomotionController::default();
//! let mut body = BodyState::at(glam::Vec3::new(0.0, 1.2, 0.0));
//!
//! // Each fixed step:
//! controller.fixed_update(&mut body, &InputSnapshot::default(), &terrain, &mut NullAnimator, dt);
//! body.integrate(dt, 9.81);
//! ```

use glam::Vec3;

use crate::input::InputSnapshot;
use crate::physics::{TerrainQuery, WORLD_UP};

use super::animation::{AnimationSink, AnimatorParam, AnimatorTrigger};
use super::body::BodyState;
use super::config::LocomotionConfig;
use super::drive::{drive_direction, forward_force, strafe_axis, strafe_force};
use super::grounding::{GroundContact, probe_ground};
use super::hover::hover_force;
use super::jump::{
    GroundingFacts, JumpKind, JumpState, dive_velocity_change, jump_velocity,
};
use super::momentum::{clamp_run_speed, next_run_speed, travel_slope_angle};
use super::orientation::{smooth_body_rotation, smooth_pivot_rotation};

/// Per-character locomotion state, mutated once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionState {
    pub is_grounded: bool,
    /// Previous tick's `is_grounded`
    pub was_grounded: bool,
    /// Ground normal while grounded, world up otherwise
    pub ground_normal: Vec3,
    /// Last accepted contact point (valid only while grounded)
    pub ground_contact_point: Vec3,
    /// 0 on grounded ticks, growing while airborne
    pub time_since_last_grounded: f32,
    /// Target run speed, always within the configured range
    pub current_run_speed: f32,
    /// Slide input held
    pub pressing_slide: bool,
    /// Slide input held while grounded
    pub is_sliding: bool,
    /// Velocity at the end of the last tick
    pub linear_velocity: Vec3,
    pub jump: JumpState,
}

impl LocomotionState {
    /// Spawn state: airborne, minimum run speed, jump and dive ready.
    pub fn spawn(config: &LocomotionConfig) -> Self {
        Self {
            is_grounded: false,
            was_grounded: false,
            ground_normal: WORLD_UP,
            ground_contact_point: Vec3::ZERO,
            time_since_last_grounded: 0.0,
            current_run_speed: config.momentum.min_run_speed,
            pressing_slide: false,
            is_sliding: false,
            linear_velocity: Vec3::ZERO,
            jump: JumpState::new(),
        }
    }

    pub fn jump_ready(&self) -> bool {
        self.jump.is_ready()
    }

    pub fn queued_jump(&self) -> bool {
        self.jump.is_queued()
    }

    pub fn dive_ready(&self) -> bool {
        self.jump.is_dive_ready()
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub grounded: bool,
    /// Grounded this tick after being airborne
    pub landed: bool,
    /// Left the ground this tick
    pub left_ground: bool,
    pub jump: Option<JumpKind>,
    pub queued_jump: bool,
    pub dive: bool,
    /// Hover velocity change along up, when the hover ran
    pub hover_force: Option<f32>,
    pub run_speed: f32,
}

/// Runner locomotion controller.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
}

impl Default for LocomotionController {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}

impl LocomotionController {
    /// Create a controller in its spawn state.
    ///
    /// The config is expected to be validated already.
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            state: LocomotionState::spawn(&config),
            config,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn is_sliding(&self) -> bool {
        self.state.is_sliding
    }

    /// Horizontal world velocity at the end of the last tick.
    pub fn flat_velocity(&self) -> Vec3 {
        let velocity = self.state.linear_velocity;
        velocity - WORLD_UP * velocity.dot(WORLD_UP)
    }

    /// Return to the spawn state, keeping the config.
    pub fn reset(&mut self) {
        self.state = LocomotionState::spawn(&self.config);
    }

    /// Run one fixed tick.
    ///
    /// Returns `None` and leaves everything untouched when `dt` is not a
    /// positive finite number.
    pub fn fixed_update(
        &mut self,
        body: &mut BodyState,
        input: &InputSnapshot,
        terrain: &dyn TerrainQuery,
        animator: &mut dyn AnimationSink,
        dt: f32,
    ) -> Option<TickReport> {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("ignoring locomotion tick with dt = {dt}");
            return None;
        }

        let config = self.config;
        let mut report = TickReport::default();

        self.state.jump.tick_timers(dt);

        let up = body.up();
        let contact = probe_ground(terrain, body.position, up, &config.probe);
        let facts = self.update_grounding(contact, dt);
        self.state.jump.observe_grounding(&facts);
        report.grounded = facts.grounded;
        report.landed = facts.landed;
        report.left_ground = self.state.was_grounded && !facts.grounded;

        self.state.pressing_slide = input.slide_held;
        self.state.is_sliding = input.slide_held && facts.grounded;

        let ground_normal = facts.grounded.then_some(self.state.ground_normal);
        let run_direction = config.run_direction();

        let direction = drive_direction(run_direction, ground_normal);
        body.apply_velocity_change(forward_force(
            body.linear_velocity,
            direction,
            self.state.current_run_speed,
            &config.drive,
            dt,
        ));
        body.apply_velocity_change(strafe_force(
            body.linear_velocity,
            strafe_axis(run_direction),
            input.horizontal,
            self.state.is_sliding,
            &config.drive,
            dt,
        ));

        if facts.grounded && self.state.jump.is_ready() {
            let force = hover_force(
                body.position,
                body.linear_velocity,
                self.state.ground_contact_point,
                self.state.ground_normal,
                up,
                &config.hover,
            );
            body.apply_velocity_change(up * force);
            report.hover_force = Some(force);
        }

        if facts.grounded {
            let slope = travel_slope_angle(self.state.ground_normal, run_direction);
            self.state.current_run_speed = next_run_speed(
                self.state.current_run_speed,
                self.state.is_sliding,
                slope,
                &config.momentum,
                dt,
            );
        }
        self.state.current_run_speed =
            clamp_run_speed(self.state.current_run_speed, &config.momentum);
        report.run_speed = self.state.current_run_speed;

        let outcome = self.state.jump.resolve(
            input.jump_pressed,
            input.dive_pressed,
            &facts,
            &config.jump,
        );
        if let Some(kind) = outcome.jump {
            body.linear_velocity = jump_velocity(body.linear_velocity, up, config.jump.jump_power);
            animator.trigger(AnimatorTrigger::Jump);
            log::debug!("{kind:?} jump at {:?}", body.position);
        }
        if outcome.dive {
            body.apply_velocity_change(dive_velocity_change(up, config.jump.dive_power));
        }
        report.jump = outcome.jump;
        report.queued_jump = outcome.queued;
        report.dive = outcome.dive;

        body.rotation =
            smooth_body_rotation(body.rotation, body.linear_velocity, &config.orientation, dt);
        body.pivot_rotation = smooth_pivot_rotation(
            body.pivot_rotation,
            body.linear_velocity,
            ground_normal,
            &config.orientation,
            dt,
        );

        animator.set_bool(AnimatorParam::Grounded, self.state.is_grounded);
        animator.set_bool(AnimatorParam::Sliding, self.state.is_sliding);

        self.state.linear_velocity = body.linear_velocity;

        log::trace!(
            "tick: grounded={} sliding={} run_speed={:.2} velocity={:?}",
            self.state.is_grounded,
            self.state.is_sliding,
            self.state.current_run_speed,
            body.linear_velocity
        );

        Some(report)
    }

    fn update_grounding(&mut self, contact: Option<GroundContact>, dt: f32) -> GroundingFacts {
        let state = &mut self.state;
        state.was_grounded = state.is_grounded;
        state.is_grounded = contact.is_some();

        match contact {
            Some(contact) => {
                state.ground_normal = contact.normal;
                state.ground_contact_point = contact.point;
                state.time_since_last_grounded = 0.0;
            }
            None => {
                state.ground_normal = WORLD_UP;
                state.time_since_last_grounded += dt;
            }
        }

        let landed = !state.was_grounded && state.is_grounded;
        if landed {
            log::debug!("landed on {:.1} degree slope", contact.map_or(0.0, |c| c.slope_degrees));
        } else if state.was_grounded && !state.is_grounded {
            log::debug!("left the ground");
        }

        GroundingFacts {
            grounded: state.is_grounded,
            landed,
            time_since_grounded: state.time_since_last_grounded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TerrainSet;
    use crate::player::animation::{NullAnimator, RecordingAnimator};

    const DT: f32 = 0.02;

    fn run(
        controller: &mut LocomotionController,
        body: &mut BodyState,
        terrain: &TerrainSet,
        input: &InputSnapshot,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            controller.fixed_update(body, input, terrain, &mut NullAnimator, DT);
            body.integrate(DT, controller.config().world.gravity);
        }
    }

    #[test]
    fn test_spawn_state() {
        let controller = LocomotionController::default();
        let state = controller.state();
        assert!(!state.is_grounded);
        assert!(state.jump_ready());
        assert!(state.dive_ready());
        assert!(!state.queued_jump());
        assert_eq!(state.current_run_speed, controller.config().momentum.min_run_speed);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new().with_flat_ground(0.0);
        let mut body = BodyState::at(Vec3::new(0.0, 1.2, 0.0));
        let before = body;

        for dt in [0.0, -0.02, f32::NAN, f32::INFINITY] {
            let report = controller.fixed_update(
                &mut body,
                &InputSnapshot::default(),
                &terrain,
                &mut NullAnimator,
                dt,
            );
            assert!(report.is_none());
        }
        assert_eq!(body, before);
        assert!(!controller.is_grounded());
    }

    #[test]
    fn test_grounds_on_flat_terrain() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new().with_flat_ground(0.0);
        let mut body = BodyState::at(Vec3::new(0.0, 1.2, 0.0));
        let mut animator = RecordingAnimator::new();

        let report = controller
            .fixed_update(&mut body, &InputSnapshot::default(), &terrain, &mut animator, DT)
            .unwrap();

        assert!(report.grounded);
        assert!(report.landed);
        assert!((controller.state().ground_normal - Vec3::Y).length() < 1e-5);
        assert!(animator.get_bool(AnimatorParam::Grounded));
    }

    #[test]
    fn test_runner_accelerates_forward() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new().with_flat_ground(0.0);
        let mut body = BodyState::at(Vec3::new(0.0, 1.2, 0.0));

        run(&mut controller, &mut body, &terrain, &InputSnapshot::default(), 50);

        assert!(controller.is_grounded());
        assert!(body.linear_velocity.z > 5.0);
        assert!(body.position.z > 1.0);
    }

    #[test]
    fn test_hover_holds_ride_height() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new().with_flat_ground(0.0);
        let mut body = BodyState::at(Vec3::new(0.0, 1.2, 0.0));

        run(&mut controller, &mut body, &terrain, &InputSnapshot::default(), 200);

        let ride_height = controller.config().hover.ride_height;
        assert!(controller.is_grounded());
        assert!((body.position.y - ride_height).abs() < 0.2);
        assert!(body.linear_velocity.y.abs() < 0.1);
    }

    #[test]
    fn test_jump_fires_animation_trigger() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new().with_flat_ground(0.0);
        let mut body = BodyState::at(Vec3::new(0.0, 1.2, 0.0));
        let mut animator = RecordingAnimator::new();

        controller.fixed_update(&mut body, &InputSnapshot::default(), &terrain, &mut animator, DT);
        let jump = InputSnapshot {
            jump_pressed: true,
            ..InputSnapshot::default()
        };
        let report = controller
            .fixed_update(&mut body, &jump, &terrain, &mut animator, DT)
            .unwrap();

        assert_eq!(report.jump, Some(JumpKind::Grounded));
        assert!((body.linear_velocity.y - controller.config().jump.jump_power).abs() < 1e-4);
        assert!(!controller.state().jump_ready());
        assert_eq!(animator.trigger_count(AnimatorTrigger::Jump), 1);
    }

    #[test]
    fn test_sliding_requires_ground() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new();
        let mut body = BodyState::at(Vec3::new(0.0, 10.0, 0.0));
        let slide = InputSnapshot {
            slide_held: true,
            ..InputSnapshot::default()
        };

        controller.fixed_update(&mut body, &slide, &terrain, &mut NullAnimator, DT);
        assert!(controller.state().pressing_slide);
        assert!(!controller.is_sliding());
    }

    #[test]
    fn test_airborne_keeps_run_speed_and_counts_air_time() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new();
        let mut body = BodyState::at(Vec3::new(0.0, 50.0, 0.0));

        run(&mut controller, &mut body, &terrain, &InputSnapshot::default(), 10);

        let state = controller.state();
        assert_eq!(state.current_run_speed, controller.config().momentum.min_run_speed);
        assert!((state.time_since_last_grounded - 10.0 * DT).abs() < 1e-4);
        assert_eq!(state.ground_normal, WORLD_UP);
    }

    #[test]
    fn test_flat_velocity_drops_vertical() {
        let mut controller = LocomotionController::default();
        let terrain = TerrainSet::new();
        let mut body = BodyState::at(Vec3::new(0.0, 50.0, 0.0));
        body.linear_velocity = Vec3::new(1.0, -20.0, 3.0);

        controller.fixed_update(&mut body, &InputSnapshot::default(), &terrain, &mut NullAnimator, DT);

        let flat = controller.flat_velocity();
        assert_eq!(flat.y, 0.0);
        assert!(flat.z > 3.0);
    }
}
