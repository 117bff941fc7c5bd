//! Physics Ball headless runner
//!
//! Plays one session without a display. A seeded bot takes the human's shots,
//! frames are fed at the nominal refresh rate and game events go to the log.
//!
//! ```text
//! physics-ball [levels|versus|tournament] [flat|cup] [--tuning FILE] [--seed N] [--shots N]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use physics_ball::consts::NOMINAL_FPS;
use physics_ball::platform::FrameClock;
use physics_ball::sim::opponent::opponent_velocity;
use physics_ball::sim::{
    BallKind, Course, GameEvent, Geometry, Gesture, Mode, Player, Session, TickInput,
    drag_for_velocity,
};
use physics_ball::{Tuning, TuningError};

/// Relative error the bot applies to each component of its ideal drag
const BOT_SPREAD: f32 = 0.08;

/// Seconds of play allowed per shot before the run is cut off
const SECONDS_PER_SHOT: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Levels,
    #[value(alias = "vs")]
    Versus,
    Tournament,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Levels => Mode::Levels,
            ModeArg::Versus => Mode::Versus,
            ModeArg::Tournament => Mode::Tournament,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Arena {
    Flat,
    #[value(alias = "room")]
    Cup,
}

#[derive(Debug, Parser)]
#[command(name = "physics-ball")]
#[command(about = "Play a Physics Ball session headless with a seeded bot", long_about = None)]
struct Args {
    /// Play mode
    #[arg(value_enum, default_value_t = ModeArg::Levels)]
    mode: ModeArg,

    /// Playfield: the flat court or the cup room
    #[arg(value_enum, default_value_t = Arena::Flat)]
    arena: Arena,

    /// JSON file overriding tuning fields of the arena's preset
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Seed for the bot's aim errors
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Shots the bot may take before the run stops
    #[arg(long, default_value_t = 20)]
    shots: u32,
}

/// Frame cap for a run of `shots` shots
fn frame_budget(shots: u32) -> u64 {
    (u64::from(shots) + 1) * SECONDS_PER_SHOT * NOMINAL_FPS as u64
}

/// Stand-in for the human: aims the ideal shot from wherever the ball rests,
/// then fumbles it a little.
struct Bot {
    rng: Pcg32,
}

impl Bot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn jitter(&mut self) -> f32 {
        1.0 + self.rng.random_range(-BOT_SPREAD..=BOT_SPREAD)
    }

    fn input<G: Geometry>(&mut self, session: &Session<G>) -> TickInput {
        let tuning = session.tuning();
        let ideal = opponent_velocity(
            session.ball().pos,
            session.level().goal.center(),
            tuning.opponent_flight_time,
            tuning.gravity,
        );

        let release = match drag_for_velocity(ideal, session.course().geometry().dimension(), tuning) {
            Gesture::Drag { dx, dy } => Gesture::Drag {
                dx: dx * self.jitter(),
                dy: dy * self.jitter(),
            },
            fling => fling,
        };

        let state = session.state();
        let select = (state.is_unlocked(BallKind::Heavy) && self.rng.random_bool(0.5)).then(|| {
            match state.ball_kind {
                BallKind::Bouncy => BallKind::Heavy,
                BallKind::Heavy => BallKind::Bouncy,
            }
        });

        TickInput {
            release: Some(release),
            select,
            ..Default::default()
        }
    }
}

fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::Launched { by, vel } => log::debug!("[{frame}] {by:?} launched {vel:?}"),
        GameEvent::Scored { by: Player::Human } => log::info!("[{frame}] Player scored"),
        GameEvent::Scored { by: Player::Pc } => log::info!("[{frame}] PC scored"),
        GameEvent::Settled { by } => log::info!("[{frame}] {by:?} missed"),
        GameEvent::TournamentOver(outcome) => log::info!("[{frame}] Tournament over: {outcome:?}"),
        other => log::debug!("[{frame}] {other:?}"),
    }
}

/// Drive `session` until the match ends or the bot has used its shots
fn run<G: Geometry>(mut session: Session<G>, bot: &mut Bot, shots: u32) {
    let mut clock = FrameClock::new();
    let max_frames = frame_budget(shots);
    let mut taken = 0;
    let mut frame = 0u64;

    while frame < max_frames {
        let dt = clock.tick(frame as f64 / f64::from(NOMINAL_FPS));
        frame += 1;

        let input = if session.state().can_launch() {
            if taken == shots {
                break;
            }
            taken += 1;
            bot.input(&session)
        } else {
            TickInput::default()
        };

        for event in session.tick(&input, dt) {
            log_event(frame, event);
        }
        if session.state().is_finished() {
            break;
        }
    }
    if frame >= max_frames {
        log::warn!("Frame limit reached with the ball still moving");
    }

    let state = session.state();
    println!("mode:    {}", state.mode.as_str());
    println!("frames:  {} ({:.1}s)", session.frames(), frame as f32 / NOMINAL_FPS);
    println!("shots:   {taken}");
    match state.mode {
        Mode::Levels => println!("level:   {} of {}", state.level + 1, session.course().len()),
        Mode::Versus | Mode::Tournament => {
            println!("score:   player {} - PC {}", state.player_score, state.pc_score);
            println!("round:   {}", state.round);
        }
    }
    if let Some(status) = session.status() {
        println!("status:  {status}");
    }
}

fn try_main(args: Args) -> Result<(), TuningError> {
    let mode = Mode::from(args.mode);
    let base = match args.arena {
        Arena::Flat => Tuning::flat(),
        Arena::Cup => Tuning::spatial(),
    };
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path, &base)?,
        None => base,
    };

    log::info!(
        "Physics Ball starting: {} on {:?}, seed {}",
        mode.as_str(),
        args.arena,
        args.seed
    );
    let mut bot = Bot::new(args.seed);
    match args.arena {
        Arena::Flat => run(Session::new(Course::flat(), mode, tuning), &mut bot, args.shots),
        Arena::Cup => run(Session::new(Course::cup_room(), mode, tuning), &mut bot, args.shots),
    }
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("physics-ball: {e}");
            ExitCode::FAILURE
        }
    }
}
