//! Per-frame session driver
//!
//! [`Session`] owns the ball, the match state and the course for one play
//! session. Each display refresh calls [`Session::tick`] with that frame's
//! input and elapsed time; the outcome of the frame's integration step feeds
//! the turn/score state machine before the call returns.

use glam::Vec3;

use super::ball::{Ball, BallKind};
use super::collision::Geometry;
use super::integrator::{self, StepOutcome};
use super::launch::{Gesture, launch_velocity, trajectory_preview};
use super::level::{Course, Level};
use super::opponent::opponent_shot;
use super::state::{Followup, GameEvent, MatchState, Mode, Phase, Player, ResetReason};
use crate::sanitize_dt;
use crate::tuning::Tuning;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Gesture released this frame (launch)
    pub release: Option<Gesture>,
    /// Gesture still being dragged (aim preview)
    pub aim: Option<Gesture>,
    /// Ball kind requested by the player
    pub select: Option<BallKind>,
    /// Put the ball back at the level start
    pub reset: bool,
}

/// One play session: a course, a mode, and everything mutated per frame
#[derive(Debug, Clone)]
pub struct Session<G> {
    course: Course<G>,
    tuning: Tuning,
    ball: Ball,
    state: MatchState,
    /// Seconds until the scheduled opponent shot
    opponent_timer: Option<f32>,
    /// Would-be launch velocity while the player is dragging
    aim: Option<Vec3>,
    events: Vec<GameEvent>,
    frames: u64,
}

impl<G: Geometry> Session<G> {
    pub fn new(course: Course<G>, mode: Mode, tuning: Tuning) -> Self {
        let ball = Ball::at_rest(course.level(0).start);
        log::info!(
            "Session started: mode={}, {:?}, {} levels",
            mode.as_str(),
            course.geometry().dimension(),
            course.len()
        );
        Self {
            course,
            tuning,
            ball,
            state: MatchState::new(mode),
            opponent_timer: None,
            aim: None,
            events: Vec::new(),
            frames: 0,
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn course(&self) -> &Course<G> {
        &self.course
    }

    pub fn level(&self) -> &Level {
        self.course.level(self.state.level)
    }

    /// Events recorded since the start of the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Current status line, if any
    pub fn status(&self) -> Option<String> {
        self.state.message.map(|m| m.to_string())
    }

    pub fn opponent_pending(&self) -> bool {
        self.opponent_timer.is_some()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Launch velocity the current drag would produce
    pub fn aim_preview(&self) -> Option<Vec3> {
        self.aim
    }

    /// Sampled arc for the current drag (empty when not aiming)
    pub fn aim_trajectory(&self, interval: f32, points: usize) -> Vec<Vec3> {
        match self.aim {
            Some(vel) => trajectory_preview(self.ball.pos, vel, self.tuning.gravity, interval, points),
            None => Vec::new(),
        }
    }

    /// Advance the session by one frame
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> &[GameEvent] {
        self.events.clear();
        self.frames += 1;
        let dt = sanitize_dt(dt).min(self.tuning.max_frame_dt);

        if let Some(kind) = input.select {
            self.select_ball(kind);
        }
        if input.reset {
            self.reset();
        }
        self.update_aim(input.aim.as_ref());
        if let Some(gesture) = input.release {
            self.launch(&gesture);
        }

        self.advance_opponent_timer(dt);
        self.integrate(dt);

        &self.events
    }

    /// Human launch. Ignored unless the ball is resting on the human's turn.
    pub fn launch(&mut self, gesture: &Gesture) -> bool {
        if !self.state.can_launch() || self.ball.launched() {
            return false;
        }
        let dimension = self.course.geometry().dimension();
        let Some(vel) = launch_velocity(gesture, dimension, &self.tuning) else {
            return false;
        };

        self.aim = None;
        self.ball.launch(vel);
        self.state.begin_flight(Player::Human);
        log::debug!("human launch {vel:?} from {:?}", self.ball.pos);
        self.events.push(GameEvent::Launched {
            by: Player::Human,
            vel,
        });
        true
    }

    /// Switch ball kind. Kinds not yet unlocked are ignored.
    pub fn select_ball(&mut self, kind: BallKind) -> bool {
        if !self.state.select_ball(kind) {
            return false;
        }
        self.events.push(GameEvent::BallSelected(kind));
        true
    }

    /// Return the ball to the level start for the human.
    ///
    /// Ignored on the PC's turn and once the match is finished. A human shot
    /// still in flight is abandoned without a turn handover.
    pub fn reset(&mut self) -> bool {
        if !self.state.player_turn || self.state.is_finished() {
            return false;
        }
        self.state.phase = Phase::Idle;
        self.place_at_start(ResetReason::UserReset);
        true
    }

    /// Start over with a fresh match in the same mode
    pub fn restart(&mut self) {
        let mode = self.state.mode;
        self.state = MatchState::new(mode);
        self.opponent_timer = None;
        self.aim = None;
        self.ball = Ball::at_rest(self.course.level(0).start);
        log::info!("Session restarted: mode={}", mode.as_str());
        self.events.push(GameEvent::Restarted);
    }

    fn update_aim(&mut self, gesture: Option<&Gesture>) {
        self.aim = match gesture {
            Some(gesture) if self.state.can_launch() && !self.ball.launched() => {
                let dimension = self.course.geometry().dimension();
                launch_velocity(gesture, dimension, &self.tuning)
            }
            _ => None,
        };
    }

    fn advance_opponent_timer(&mut self, dt: f32) {
        let Some(remaining) = self.opponent_timer.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return;
        }
        self.opponent_timer = None;

        if self.state.player_turn || self.state.phase != Phase::Idle {
            return;
        }
        let level = self.course.level(self.state.level);
        let vel = opponent_shot(level, &self.tuning);
        self.ball.place(level.start);
        self.ball.launch(vel);
        self.state.begin_flight(Player::Pc);
        log::debug!("PC launch {vel:?}");
        self.events.push(GameEvent::Launched { by: Player::Pc, vel });
    }

    fn integrate(&mut self, dt: f32) {
        let level = self.course.level(self.state.level);
        let outcome = integrator::step(
            &mut self.ball,
            dt,
            self.course.geometry(),
            level,
            self.state.ball_kind.restitution(),
            &self.tuning,
        );

        let reason = match outcome {
            StepOutcome::Resting | StepOutcome::Flying(_) => return,
            StepOutcome::Settled => ResetReason::NaturalSettle,
            StepOutcome::Captured { at } => {
                log::debug!("{:?} captured at {at:?}", self.state.active_player());
                ResetReason::Capture
            }
        };

        let followup = self.state.resolve_shot(
            reason,
            self.course.len(),
            self.tuning.tournament_rounds,
            &mut self.events,
        );
        match followup {
            Followup::Stay => {}
            Followup::ResetBall(reason) => self.place_at_start(reason),
            Followup::ScheduleOpponent => self.opponent_timer = Some(self.tuning.opponent_delay),
        }
    }

    fn place_at_start(&mut self, reason: ResetReason) {
        let start = self.course.level(self.state.level).start;
        self.ball.place(start);
        self.aim = None;
        self.events.push(GameEvent::BallReset(reason));
    }
}
