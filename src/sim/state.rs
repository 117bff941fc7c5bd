//! Match state and the turn/score state machine
//!
//! Nothing here knows about geometry or time. The session reports how each
//! shot ended (tagged with a [`ResetReason`]) and [`MatchState`] answers with
//! a [`Followup`] telling the session what to do with the ball next.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::BallKind;

/// Play mode, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Single player, levels consumed in order
    #[default]
    Levels,
    /// Human and PC alternate shots forever
    Versus,
    /// Human and PC alternate for a fixed number of rounds
    Tournament,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Levels => "levels",
            Mode::Versus => "versus",
            Mode::Tournament => "tournament",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "levels" => Some(Mode::Levels),
            "versus" | "vs" => Some(Mode::Versus),
            "tournament" => Some(Mode::Tournament),
            _ => None,
        }
    }

    /// Whether turns, scores and rounds matter
    pub fn is_competitive(&self) -> bool {
        !matches!(self, Mode::Levels)
    }
}

/// Who is shooting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    Human,
    Pc,
}

/// Final result of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWins,
    PcWins,
    Tied,
}

impl Outcome {
    pub fn decide(player_score: u32, pc_score: u32) -> Self {
        match player_score.cmp(&pc_score) {
            std::cmp::Ordering::Greater => Outcome::PlayerWins,
            std::cmp::Ordering::Less => Outcome::PcWins,
            std::cmp::Ordering::Equal => Outcome::Tied,
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Ball resting, waiting for the active player's shot
    #[default]
    Idle,
    /// Ball in flight
    InFlight,
    /// Every level has been cleared
    LevelsComplete,
    /// The last tournament round has been played
    TournamentOver(Outcome),
}

/// Why the ball came to rest or was moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    /// The player asked for the ball back
    UserReset,
    /// The next level was loaded
    LevelAdvance,
    /// A new versus exchange or tournament round began
    RoundReset,
    /// The ball stopped bouncing without scoring
    NaturalSettle,
    /// The ball entered the goal
    Capture,
}

impl ResetReason {
    /// Only real shot outcomes drive turn handover
    pub fn ends_shot(&self) -> bool {
        matches!(self, ResetReason::NaturalSettle | ResetReason::Capture)
    }
}

/// Transient status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    Scored,
    AllLevelsComplete,
    TournamentWon,
    TournamentLost,
    TournamentTied,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatusMessage::Scored => "Scored!",
            StatusMessage::AllLevelsComplete => "All levels complete",
            StatusMessage::TournamentWon => "You won the tournament!",
            StatusMessage::TournamentLost => "PC wins the tournament",
            StatusMessage::TournamentTied => "Tournament tied",
        })
    }
}

impl From<Outcome> for StatusMessage {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::PlayerWins => StatusMessage::TournamentWon,
            Outcome::PcWins => StatusMessage::TournamentLost,
            Outcome::Tied => StatusMessage::TournamentTied,
        }
    }
}

/// Events produced during a tick, for rendering/UI adapters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { by: Player, vel: Vec3 },
    Settled { by: Player },
    Scored { by: Player },
    BallSelected(BallKind),
    Unlocked(BallKind),
    LevelAdvanced { level: usize },
    LevelsComplete,
    TurnChanged(Player),
    RoundStarted { round: u32 },
    TournamentOver(Outcome),
    BallReset(ResetReason),
    Restarted,
}

/// What the session must do after a shot resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    /// Leave the ball where it is
    Stay,
    /// Move the ball to the current level's start
    ResetBall(ResetReason),
    /// Start the opponent's delayed shot
    ScheduleOpponent,
}

/// Score, turn and progression state of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: Mode,
    /// Current level index
    pub level: usize,
    /// Active ball kind
    pub ball_kind: BallKind,
    /// Kinds the player may select (only grows)
    pub unlocked: Vec<BallKind>,
    pub message: Option<StatusMessage>,
    /// True while the human is the active player
    pub player_turn: bool,
    pub player_score: u32,
    pub pc_score: u32,
    /// 1-based tournament round
    pub round: u32,
    pub phase: Phase,
}

impl MatchState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            level: 0,
            ball_kind: BallKind::Bouncy,
            unlocked: vec![BallKind::Bouncy],
            message: None,
            player_turn: true,
            player_score: 0,
            pc_score: 0,
            round: 1,
            phase: Phase::Idle,
        }
    }

    pub fn active_player(&self) -> Player {
        if self.player_turn {
            Player::Human
        } else {
            Player::Pc
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::LevelsComplete | Phase::TournamentOver(_))
    }

    /// The human may launch now
    pub fn can_launch(&self) -> bool {
        self.phase == Phase::Idle && self.player_turn
    }

    pub fn is_unlocked(&self, kind: BallKind) -> bool {
        self.unlocked.contains(&kind)
    }

    /// Switch ball kind if unlocked. Returns whether anything changed.
    pub fn select_ball(&mut self, kind: BallKind) -> bool {
        if !self.is_unlocked(kind) || self.ball_kind == kind {
            return false;
        }
        self.ball_kind = kind;
        true
    }

    /// Add `kind` to the unlocked set. Returns true if it was new.
    pub fn unlock(&mut self, kind: BallKind) -> bool {
        if self.is_unlocked(kind) {
            return false;
        }
        self.unlocked.push(kind);
        self.unlocked.sort();
        true
    }

    /// A shot has left the ground. Refused once the match is finished.
    pub fn begin_flight(&mut self, by: Player) -> bool {
        if self.is_finished() {
            return false;
        }
        self.phase = Phase::InFlight;
        if by == Player::Human {
            self.message = None;
        }
        true
    }

    /// Apply the end of a shot.
    ///
    /// `reason` must be [`ResetReason::Capture`] or
    /// [`ResetReason::NaturalSettle`]; any other reason is a programmatic
    /// reset and leaves the match untouched.
    pub fn resolve_shot(
        &mut self,
        reason: ResetReason,
        level_count: usize,
        rounds: u32,
        events: &mut Vec<GameEvent>,
    ) -> Followup {
        if !reason.ends_shot() || self.phase != Phase::InFlight {
            return Followup::Stay;
        }
        self.phase = Phase::Idle;

        let shooter = self.active_player();
        let captured = reason == ResetReason::Capture;
        if captured {
            self.message = Some(StatusMessage::Scored);
            events.push(GameEvent::Scored { by: shooter });
        } else {
            events.push(GameEvent::Settled { by: shooter });
        }

        match self.mode {
            Mode::Levels if captured => self.advance_level(level_count, events),
            // A miss in levels mode leaves the ball where it stopped
            Mode::Levels => Followup::Stay,
            Mode::Versus | Mode::Tournament => {
                if captured {
                    match shooter {
                        Player::Human => self.player_score += 1,
                        Player::Pc => self.pc_score += 1,
                    }
                }
                match shooter {
                    Player::Human => {
                        self.player_turn = false;
                        log::debug!("turn handed to PC");
                        events.push(GameEvent::TurnChanged(Player::Pc));
                        Followup::ScheduleOpponent
                    }
                    Player::Pc => self.finish_round(rounds, events),
                }
            }
        }
    }

    fn advance_level(&mut self, level_count: usize, events: &mut Vec<GameEvent>) -> Followup {
        if self.level == 0 && self.unlock(BallKind::Heavy) {
            log::info!("Unlocked {} ball", BallKind::Heavy.as_str());
            events.push(GameEvent::Unlocked(BallKind::Heavy));
        }

        if self.level + 1 < level_count {
            self.level += 1;
            log::info!("Advanced to level {}", self.level + 1);
            events.push(GameEvent::LevelAdvanced { level: self.level });
            Followup::ResetBall(ResetReason::LevelAdvance)
        } else {
            self.message = Some(StatusMessage::AllLevelsComplete);
            self.phase = Phase::LevelsComplete;
            log::info!("All {level_count} levels complete");
            events.push(GameEvent::LevelsComplete);
            Followup::Stay
        }
    }

    /// Both players have shot: start the next exchange or end the tournament
    fn finish_round(&mut self, rounds: u32, events: &mut Vec<GameEvent>) -> Followup {
        self.player_turn = true;

        if self.mode == Mode::Tournament && self.round >= rounds {
            let outcome = Outcome::decide(self.player_score, self.pc_score);
            self.message = Some(outcome.into());
            self.phase = Phase::TournamentOver(outcome);
            log::info!(
                "Tournament over after {} rounds: player {} - PC {} ({:?})",
                self.round,
                self.player_score,
                self.pc_score,
                outcome
            );
            events.push(GameEvent::TournamentOver(outcome));
            return Followup::Stay;
        }

        events.push(GameEvent::TurnChanged(Player::Human));
        if self.mode == Mode::Tournament {
            self.round += 1;
            log::info!("Tournament round {} of {}", self.round, rounds);
            events.push(GameEvent::RoundStarted { round: self.round });
        }
        Followup::ResetBall(ResetReason::RoundReset)
    }
}
