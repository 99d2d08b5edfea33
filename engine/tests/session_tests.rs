//! Session Tests - Keyboard to Body
//!
//! End-to-end through [`RunnerSession`]: key events go in, the body moves on
//! a real terrain with gravity, and the stats and speed effect follow.

use glam::Vec3;

use dash_runner_engine::input::{InputAction, KeyBindings, KeyCode};
use dash_runner_engine::logging;
use dash_runner_engine::physics::TerrainSet;
use dash_runner_engine::player::{JumpKind, LocomotionConfig};
use dash_runner_engine::session::RunnerSession;

const DT: f32 = 0.02;

fn session_with(config: LocomotionConfig) -> RunnerSession {
    session_on(config, TerrainSet::new().with_flat_ground(0.0))
}

fn session_on(config: LocomotionConfig, terrain: TerrainSet) -> RunnerSession {
    logging::init_for_tests();
    let mut session = RunnerSession::builder()
        .config(config)
        .terrain(terrain)
        .spawn_at(Vec3::new(0.0, config.hover.ride_height, 0.0))
        .build()
        .expect("valid session");
    session.start();
    session
}

fn running_session() -> RunnerSession {
    session_with(LocomotionConfig::default())
}

fn steps(session: &mut RunnerSession, count: usize) {
    for _ in 0..count {
        session.fixed_step(DT).expect("valid dt");
    }
}

#[test]
fn test_space_jumps() {
    let mut session = running_session();
    steps(&mut session, 1);
    assert!(session.controller().is_grounded());

    session.handle_key(KeyCode::Space, true);
    let report = session.fixed_step(DT).expect("valid dt");

    assert_eq!(report.jump, Some(JumpKind::Grounded));
    assert!(session.body().linear_velocity.y > 8.0);
    assert_eq!(session.stats().grounded_jumps, 1);
}

#[test]
fn test_held_space_jumps_once() {
    let mut session = running_session();
    steps(&mut session, 1);

    session.handle_key(KeyCode::Space, true);
    steps(&mut session, 150);

    assert_eq!(session.stats().total_jumps(), 1);
    // Spawn landing plus the landing after the jump.
    assert!(session.stats().landings >= 2);
}

#[test]
fn test_stopped_session_sees_idle_input() {
    let mut session = running_session();
    steps(&mut session, 1);
    session.stop();

    session.handle_key(KeyCode::D, true);
    session.tap(KeyCode::Space);
    steps(&mut session, 10);

    assert_eq!(session.stats().total_jumps(), 0);
    assert!(session.flat_velocity().x.abs() < 1e-4);
}

#[test]
fn test_restart_resumes_input() {
    let mut session = running_session();
    steps(&mut session, 1);
    session.stop();
    session.start();

    session.tap(KeyCode::Space);
    let report = session.fixed_step(DT).expect("valid dt");
    assert!(report.jump.is_some());
}

#[test]
fn test_strafe_keys_move_sideways() {
    let mut session = running_session();
    session.handle_key(KeyCode::D, true);
    steps(&mut session, 20);
    assert!(session.flat_velocity().x > 1.0);

    session.handle_key(KeyCode::D, false);
    session.handle_key(KeyCode::A, true);
    steps(&mut session, 20);
    assert!(session.flat_velocity().x < -1.0);
}

#[test]
fn test_shift_slides_on_ground() {
    let mut session = running_session();
    session.handle_key(KeyCode::ShiftLeft, true);
    steps(&mut session, 2);
    assert!(session.controller().is_sliding());

    session.handle_key(KeyCode::ShiftLeft, false);
    steps(&mut session, 1);
    assert!(!session.controller().is_sliding());
}

#[test]
fn test_remapped_jump_key() {
    let mut bindings = KeyBindings::new();
    bindings.bind(KeyCode::ArrowUp, InputAction::Jump);

    let config = LocomotionConfig::default();
    let mut session = RunnerSession::builder()
        .config(config)
        .terrain(TerrainSet::new().with_flat_ground(0.0))
        .spawn_at(Vec3::new(0.0, config.hover.ride_height, 0.0))
        .bindings(bindings)
        .build()
        .expect("valid session");
    session.start();
    steps(&mut session, 1);

    session.tap(KeyCode::Space);
    assert!(session.fixed_step(DT).expect("valid dt").jump.is_none());

    session.tap(KeyCode::ArrowUp);
    assert!(session.fixed_step(DT).expect("valid dt").jump.is_some());
}

#[test]
fn test_speed_effect_near_top_speed() {
    let mut config = LocomotionConfig::default();
    // Threshold drops to 10 m/s, below the minimum run speed.
    config.effects.speed_effect_margin = 30.0;
    let mut session = session_with(config);

    steps(&mut session, 5);
    assert!(!session.speed_effect().is_active());
    assert!(session.effect_pose().is_none());

    steps(&mut session, 60);
    assert!(session.speed_effect().is_active());
    assert_eq!(session.speed_effect().activations(), 1);

    let pose = session.effect_pose().expect("effect showing");
    let body = session.body().position;
    assert!(pose.position.z > body.z);
    assert!((pose.position - body).length() > config.effects.speed_effect_offset - 0.1);
}

#[test]
fn test_speed_effect_off_at_default_margin() {
    let mut session = running_session();
    steps(&mut session, 100);
    assert!(!session.speed_effect().is_active());
    assert_eq!(session.speed_effect().activations(), 0);
}

#[test]
fn test_stats_track_the_run() {
    let mut session = running_session();
    let mut ran = 0;
    for _ in 0..25 {
        ran += session.update(0.04);
    }

    let stats = session.stats();
    assert_eq!(ran, 50);
    assert_eq!(stats.ticks, 50);
    assert_eq!(stats.landings, 1);
    assert!(stats.distance > 5.0);
    assert!(stats.top_speed > 10.0 && stats.top_speed < 13.0);
    assert!(stats.peak_hover_force > 0.0);
}

#[test]
fn test_respawn_restores_spawn_pose() {
    let mut session = running_session();
    session.handle_key(KeyCode::D, true);
    steps(&mut session, 30);

    session.respawn();
    assert_eq!(session.body().position, Vec3::new(0.0, 1.2, 0.0));
    assert_eq!(session.body().linear_velocity, Vec3::ZERO);
    assert_eq!(session.controller().state().current_run_speed, 12.0);
}

/// Jump, dive at the apex, then run on. Returns the lowest body height seen
/// from the dive onward.
fn jump_and_dive_at_apex(session: &mut RunnerSession) -> f32 {
    steps(session, 50);
    assert!(session.controller().is_grounded());

    session.tap(KeyCode::Space);
    steps(session, 1);
    let mut rising = 0;
    while session.body().linear_velocity.y > 0.0 {
        assert!(rising < 200, "jump never peaked");
        steps(session, 1);
        rising += 1;
    }
    assert!(!session.controller().is_grounded());

    session.tap(KeyCode::C);
    let mut lowest = f32::MAX;
    for _ in 0..300 {
        steps(session, 1);
        lowest = lowest.min(session.body().position.y);
    }
    lowest
}

#[test]
fn test_apex_dive_lands_on_plane() {
    let config = LocomotionConfig::default();
    let mut session = session_with(config);

    let lowest = jump_and_dive_at_apex(&mut session);

    assert_eq!(session.stats().dives, 1);
    assert!(session.controller().is_grounded());
    assert!((session.body().position.y - config.hover.ride_height).abs() < 0.2);
    assert!(lowest > 0.9, "sank to {lowest}");
}

#[test]
fn test_apex_dive_lands_on_box() {
    let config = LocomotionConfig::default();
    let floor = TerrainSet::new().with_box(Vec3::new(-10.0, -2.0, -10.0), Vec3::new(10.0, 0.0, 1000.0));
    let mut session = session_on(config, floor);

    let lowest = jump_and_dive_at_apex(&mut session);

    assert_eq!(session.stats().dives, 1);
    assert!(session.controller().is_grounded());
    assert!((session.body().position.y - config.hover.ride_height).abs() < 0.2);
    assert!(lowest > 0.9, "sank to {lowest}");
}
