//! Runner Session
//!
//! Composition root for one running character. Owns the input service, the
//! locomotion controller, the body, the terrain and the animation sink, and
//! runs them in the right order each fixed step:
//!
//! 1. Input snapshot (drains this session's queued edges)
//! 2. Locomotion controller tick
//! 3. Body integration with gravity, swept against the terrain
//! 4. Speed effect gate
//!
//! [`RunnerSession::update`] takes a variable frame delta and runs as many
//! fixed steps as it covers.

use glam::Vec3;
use thiserror::Error;

use crate::input::{InputManager, InputSnapshot, KeyBindings, KeyCode, SubscriptionId};
use crate::physics::TerrainQuery;
use crate::player::{
    AnimationSink, BodyState, ConfigError, EffectPose, JumpKind, LocomotionConfig,
    LocomotionController, RecordingAnimator, SpeedEffectGate, TickReport,
};

/// Upper bound on fixed steps per [`RunnerSession::update`] call.
pub const MAX_FIXED_STEPS_PER_FRAME: usize = 8;

/// Frame deltas above this are clamped (seconds).
const MAX_FRAME_DELTA_S: f32 = 0.1;

/// Errors raised while assembling a session.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("session has no terrain to stand on")]
    MissingTerrain,
    #[error("session has no body to move")]
    MissingBody,
    #[error("invalid locomotion config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Running totals over a session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub simulated_time: f32,
    pub grounded_jumps: u32,
    pub coyote_jumps: u32,
    pub buffered_jumps: u32,
    pub queued_jumps: u32,
    pub dives: u32,
    pub landings: u32,
    /// Highest flat speed seen (m/s)
    pub top_speed: f32,
    /// Largest hover velocity change magnitude applied in one tick
    pub peak_hover_force: f32,
    /// Distance travelled along the run direction (m)
    pub distance: f32,
}

impl SessionStats {
    /// Jumps of every kind.
    pub fn total_jumps(&self) -> u32 {
        self.grounded_jumps + self.coyote_jumps + self.buffered_jumps
    }

    fn record(&mut self, report: &TickReport, dt: f32, flat_speed: f32) {
        self.ticks += 1;
        self.simulated_time += dt;
        match report.jump {
            Some(JumpKind::Grounded) => self.grounded_jumps += 1,
            Some(JumpKind::Coyote) => self.coyote_jumps += 1,
            Some(JumpKind::Buffered) => self.buffered_jumps += 1,
            None => {}
        }
        if report.queued_jump {
            self.queued_jumps += 1;
        }
        if report.dive {
            self.dives += 1;
        }
        if report.landed {
            self.landings += 1;
        }
        self.top_speed = self.top_speed.max(flat_speed);
        if let Some(force) = report.hover_force {
            self.peak_hover_force = self.peak_hover_force.max(force.abs());
        }
    }
}

/// Builder for [`RunnerSession`].
#[derive(Default)]
pub struct SessionBuilder {
    config: LocomotionConfig,
    terrain: Option<Box<dyn TerrainQuery>>,
    body: Option<BodyState>,
    animator: Option<Box<dyn AnimationSink>>,
    bindings: Option<KeyBindings>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn terrain(mut self, terrain: impl TerrainQuery + 'static) -> Self {
        self.terrain = Some(Box::new(terrain));
        self
    }

    pub fn body(mut self, body: BodyState) -> Self {
        self.body = Some(body);
        self
    }

    /// Shorthand for a body at rest at `position`.
    pub fn spawn_at(self, position: Vec3) -> Self {
        self.body(BodyState::at(position))
    }

    /// Animation sink. Defaults to a [`RecordingAnimator`].
    pub fn animator(mut self, animator: impl AnimationSink + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Assemble the session. The config is validated here.
    pub fn build(self) -> Result<RunnerSession, SetupError> {
        let result = self.try_build();
        if let Err(err) = &result {
            log::error!("runner session setup failed: {err}");
        }
        result
    }

    fn try_build(self) -> Result<RunnerSession, SetupError> {
        self.config.validate()?;
        let terrain = self.terrain.ok_or(SetupError::MissingTerrain)?;
        let body = self.body.ok_or(SetupError::MissingBody)?;
        let animator = self
            .animator
            .unwrap_or_else(|| Box::new(RecordingAnimator::new()) as Box<dyn AnimationSink>);
        let input = self
            .bindings
            .map(InputManager::with_bindings)
            .unwrap_or_default();

        log::debug!("runner session built, spawn at {:?}", body.position);

        Ok(RunnerSession {
            controller: LocomotionController::new(self.config),
            input,
            subscription: None,
            body,
            spawn: body,
            terrain,
            animator,
            effect: SpeedEffectGate::new(),
            effect_pose: None,
            accumulator: 0.0,
            stats: SessionStats::default(),
        })
    }
}

/// One running character and everything it needs.
pub struct RunnerSession {
    controller: LocomotionController,
    input: InputManager,
    subscription: Option<SubscriptionId>,
    body: BodyState,
    spawn: BodyState,
    terrain: Box<dyn TerrainQuery>,
    animator: Box<dyn AnimationSink>,
    effect: SpeedEffectGate,
    effect_pose: Option<EffectPose>,
    accumulator: f32,
    stats: SessionStats,
}

impl RunnerSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start receiving input. Does nothing if already started.
    pub fn start(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.input.subscribe());
            log::info!("runner session started");
        }
    }

    /// Stop receiving input. Ticks while stopped see an idle snapshot.
    pub fn stop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.input.unsubscribe(id);
            log::info!("runner session stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Forward a key event to the input service.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        self.input.handle_key(key, pressed);
    }

    /// Press and release a key within the current frame.
    pub fn tap(&mut self, key: KeyCode) {
        self.input.tap(key);
    }

    /// Advance by a variable frame delta, running whole fixed steps.
    ///
    /// Returns the number of fixed steps run.
    pub fn update(&mut self, frame_delta: f32) -> usize {
        let step = self.controller.config().world.fixed_timestep;
        let delta = if frame_delta.is_finite() {
            frame_delta.clamp(0.0, MAX_FRAME_DELTA_S)
        } else {
            0.0
        };
        self.accumulator = (self.accumulator + delta).min(step * MAX_FIXED_STEPS_PER_FRAME as f32);

        let mut steps = 0usize;
        while self.accumulator >= step && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.fixed_step(step);
            self.accumulator -= step;
            steps += 1;
        }
        steps
    }

    /// Run exactly one fixed step of `dt` seconds.
    ///
    /// Returns `None` when `dt` is rejected by the controller.
    pub fn fixed_step(&mut self, dt: f32) -> Option<TickReport> {
        let input = match self.subscription {
            Some(id) => self.input.snapshot(id),
            None => InputSnapshot::default(),
        };

        let start_along = self.body.position.dot(self.controller.config().run_direction());
        let report = self.controller.fixed_update(
            &mut self.body,
            &input,
            self.terrain.as_ref(),
            self.animator.as_mut(),
            dt,
        )?;

        let config = *self.controller.config();
        self.body
            .integrate_against(dt, config.world.gravity, self.terrain.as_ref(), &config.probe);

        let flat_velocity = self.body.flat_velocity();
        self.stats.record(&report, dt, flat_velocity.length());
        self.stats.distance += self.body.position.dot(config.run_direction()) - start_along;
        self.effect_pose =
            self.effect
                .update(self.body.position, flat_velocity, &config.momentum, &config.effects);

        Some(report)
    }

    /// Put the body back at its spawn pose and reset the controller.
    pub fn respawn(&mut self) {
        self.body = self.spawn;
        self.controller.reset();
        self.accumulator = 0.0;
        log::debug!("respawned at {:?}", self.body.position);
    }

    pub fn body(&self) -> &BodyState {
        &self.body
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Horizontal world velocity of the body.
    pub fn flat_velocity(&self) -> Vec3 {
        self.body.flat_velocity()
    }

    pub fn speed_effect(&self) -> &SpeedEffectGate {
        &self.effect
    }

    /// Speed effect pose from the last step, if showing.
    pub fn effect_pose(&self) -> Option<EffectPose> {
        self.effect_pose
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Drop for RunnerSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TerrainSet;

    fn flat_session() -> RunnerSession {
        RunnerSession::builder()
            .terrain(TerrainSet::new().with_flat_ground(0.0))
            .spawn_at(Vec3::new(0.0, 1.2, 0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_terrain() {
        let result = RunnerSession::builder().spawn_at(Vec3::ZERO).build();
        assert!(matches!(result, Err(SetupError::MissingTerrain)));
    }

    #[test]
    fn test_missing_body() {
        let result = RunnerSession::builder()
            .terrain(TerrainSet::new())
            .build();
        assert!(matches!(result, Err(SetupError::MissingBody)));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = LocomotionConfig::default();
        config.probe.radius = -1.0;
        let result = RunnerSession::builder()
            .config(config)
            .terrain(TerrainSet::new())
            .spawn_at(Vec3::ZERO)
            .build();
        assert!(matches!(result, Err(SetupError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_stop() {
        let mut session = flat_session();
        assert!(!session.is_running());
        session.start();
        session.start();
        assert!(session.is_running());
        assert_eq!(session.input().dispatcher().subscriber_count(), 1);

        session.stop();
        assert!(!session.is_running());
        assert_eq!(session.input().dispatcher().subscriber_count(), 0);
    }

    #[test]
    fn test_stopped_session_ignores_jump() {
        let mut session = flat_session();
        session.fixed_step(0.02);
        session.tap(KeyCode::Space);
        let report = session.fixed_step(0.02).unwrap();
        assert!(report.jump.is_none());
    }

    #[test]
    fn test_update_runs_whole_steps() {
        let mut session = flat_session();
        assert_eq!(session.update(0.05), 2);
        assert_eq!(session.update(0.035), 2);
        assert_eq!(session.stats().ticks, 4);
    }

    #[test]
    fn test_update_clamps_long_frames() {
        let mut session = flat_session();
        let steps = session.update(10.0);
        assert!(steps > 0 && steps <= MAX_FIXED_STEPS_PER_FRAME);

        let mut session = flat_session();
        assert_eq!(session.update(f32::NAN), 0);
        assert_eq!(session.update(-1.0), 0);
    }

    #[test]
    fn test_respawn() {
        let mut session = flat_session();
        for _ in 0..20 {
            session.fixed_step(0.02);
        }
        assert!(session.body().position.z > 0.0);
        session.respawn();
        assert_eq!(session.body().position, Vec3::new(0.0, 1.2, 0.0));
        assert!(!session.controller().is_grounded());
    }
}
