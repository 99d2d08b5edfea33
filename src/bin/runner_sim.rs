//! Headless Runner Simulation
//!
//! Run with: `cargo run --bin runner_sim -- --ticks 1500 --verbose`
//!
//! Runs the locomotion controller over a fixed demo course without a window:
//!
//! - Flat run-up with a little strafing and a couple of jumps
//! - Downhill ramp taken sliding
//! - A short staircase the hover has to climb
//! - A gap that needs a jump
//!
//! Inputs are scripted as key cues triggered by distance along the course.
//! A summary is logged at the end. Falling off the course ends the run with
//! an error.

use std::path::PathBuf;

use clap::Parser;
use glam::{Quat, Vec3};
use thiserror::Error;

use dash_runner_engine::input::KeyCode;
use dash_runner_engine::logging;
use dash_runner_engine::physics::TerrainSet;
use dash_runner_engine::player::{ConfigError, LocomotionConfig};
use dash_runner_engine::session::{RunnerSession, SetupError};

/// Falling below this height ends the run as a failure.
const KILL_HEIGHT: f32 = -40.0;

/// Course half width (meters).
const COURSE_HALF_WIDTH: f32 = 8.0;

/// Headless endless-runner locomotion simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON locomotion config; fields not named keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 1500)]
    ticks: u32,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("runner fell off the course at tick {tick} (z = {z:.1} m)")]
    Fell { tick: u32, z: f32 },
}

#[derive(Debug, Clone, Copy)]
enum CueAction {
    Press(KeyCode),
    Release(KeyCode),
    Tap(KeyCode),
}

/// Scripted input fired once when the runner passes `at_z`.
#[derive(Debug, Clone, Copy)]
struct Cue {
    at_z: f32,
    action: CueAction,
    fired: bool,
}

impl Cue {
    fn new(at_z: f32, action: CueAction) -> Self {
        Self {
            at_z,
            action,
            fired: false,
        }
    }

    fn apply(&self, session: &mut RunnerSession) {
        match self.action {
            CueAction::Press(key) => session.handle_key(key, true),
            CueAction::Release(key) => session.handle_key(key, false),
            CueAction::Tap(key) => session.tap(key),
        }
    }
}

/// Landmarks of the demo course along +Z.
struct Course {
    terrain: TerrainSet,
    ramp_start_z: f32,
    ramp_end_z: f32,
    gap_start_z: f32,
}

fn block(min_z: f32, max_z: f32, top: f32) -> (Vec3, Vec3) {
    (
        Vec3::new(-COURSE_HALF_WIDTH, top - 2.0, min_z),
        Vec3::new(COURSE_HALF_WIDTH, top, max_z),
    )
}

/// Build the course; the landing strip is `strip_length` meters long.
fn demo_course(strip_length: f32) -> Course {
    let mut terrain = TerrainSet::new();

    // Run-up
    let run_up_end = 60.0;
    let (min, max) = block(-5.0, run_up_end, 0.0);
    terrain = terrain.with_box(min, max);

    // Downhill ramp, pitched so +Z goes down
    let pitch = 15f32.to_radians();
    let half_length = 20.0;
    let tangent = Quat::from_rotation_x(pitch) * Vec3::Z;
    let ramp_start = Vec3::new(0.0, 0.0, run_up_end);
    let ramp_end = ramp_start + tangent * (2.0 * half_length);
    terrain = terrain.with_ramp(
        ramp_start + tangent * half_length,
        pitch,
        COURSE_HALF_WIDTH,
        half_length,
    );

    // Flat run-out, then three steps up
    let mut z = ramp_end.z;
    let mut top = ramp_end.y;
    let (min, max) = block(z, z + 40.0, top);
    terrain = terrain.with_box(min, max);
    z += 40.0;
    for _ in 0..3 {
        top += 0.3;
        let (min, max) = block(z, z + 8.0, top);
        terrain = terrain.with_box(min, max);
        z += 8.0;
    }

    // Gap, then the landing strip
    let gap_start_z = z;
    let (min, max) = block(z + 6.0, z + 6.0 + strip_length, top);
    terrain = terrain.with_box(min, max);

    Course {
        terrain,
        ramp_start_z: ramp_start.z,
        ramp_end_z: ramp_end.z,
        gap_start_z,
    }
}

fn script(course: &Course) -> Vec<Cue> {
    use CueAction::{Press, Release, Tap};

    vec![
        Cue::new(10.0, Press(KeyCode::D)),
        Cue::new(14.0, Release(KeyCode::D)),
        Cue::new(18.0, Press(KeyCode::A)),
        Cue::new(22.0, Release(KeyCode::A)),
        Cue::new(28.0, Tap(KeyCode::Space)),
        // Late press while still in the air: queued for the landing
        Cue::new(44.0, Tap(KeyCode::Space)),
        Cue::new(50.0, Tap(KeyCode::C)),
        Cue::new(course.ramp_start_z + 1.0, Press(KeyCode::ShiftLeft)),
        Cue::new(course.ramp_end_z + 5.0, Release(KeyCode::ShiftLeft)),
        Cue::new(course.gap_start_z - 3.0, Tap(KeyCode::Space)),
    ]
}

fn main() -> Result<(), SimError> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => LocomotionConfig::load(path)?,
        None => LocomotionConfig::default(),
    };

    if args.dump_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    // Long enough to stay on at top speed for the whole run.
    let strip_length = (args.ticks as f32 * config.world.fixed_timestep * config.momentum.max_run_speed).max(200.0);
    let course = demo_course(strip_length);
    let mut cues = script(&course);
    log::info!(
        "course: {} pieces, ramp {:.0}-{:.0} m, gap at {:.0} m",
        course.terrain.len(),
        course.ramp_start_z,
        course.ramp_end_z,
        course.gap_start_z
    );

    let mut session = RunnerSession::builder()
        .config(config)
        .terrain(course.terrain)
        .spawn_at(Vec3::new(0.0, config.hover.ride_height, 0.0))
        .build()?;
    session.start();

    let dt = config.world.fixed_timestep;

    for tick in 0..args.ticks {
        let z = session.body().position.z;
        for cue in cues.iter_mut().filter(|cue| !cue.fired && z >= cue.at_z) {
            cue.fired = true;
            cue.apply(&mut session);
            log::debug!("cue {:?} at z = {z:.1}", cue.action);
        }

        session.fixed_step(dt);

        if session.body().position.y < KILL_HEIGHT {
            let z = session.body().position.z;
            log::error!("runner fell at tick {tick}, z = {z:.1}");
            session.stop();
            return Err(SimError::Fell { tick, z });
        }

        if tick % 250 == 0 {
            let body = session.body();
            log::info!(
                "t={:5.2}s z={:7.1} y={:6.2} speed={:5.1} grounded={}",
                session.stats().simulated_time,
                body.position.z,
                body.position.y,
                session.flat_velocity().length(),
                session.controller().is_grounded()
            );
        }
    }

    session.stop();

    let stats = session.stats();
    log::info!("simulated {} ticks ({:.1}s)", stats.ticks, stats.simulated_time);
    log::info!("distance: {:.1} m, top speed: {:.1} m/s", stats.distance, stats.top_speed);
    log::info!(
        "jumps: {} (grounded {}, coyote {}, buffered {}), queued presses: {}, dives: {}",
        stats.total_jumps(),
        stats.grounded_jumps,
        stats.coyote_jumps,
        stats.buffered_jumps,
        stats.queued_jumps,
        stats.dives
    );
    log::info!(
        "landings: {}, peak hover force: {:.2}, speed effect shown {} times",
        stats.landings,
        stats.peak_hover_force,
        session.speed_effect().activations()
    );

    Ok(())
}
