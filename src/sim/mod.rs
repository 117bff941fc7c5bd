//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, reads the
//! clock or touches the platform:
//! - Frame time is passed in by the caller
//! - Geometry is a pluggable [`collision::Geometry`] strategy
//! - Turn and score rules live in [`state::MatchState`], apart from physics

pub mod ball;
pub mod collision;
pub mod integrator;
pub mod launch;
pub mod level;
pub mod opponent;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallKind, BallState};
pub use collision::{Contact, CupRoom, FlatCourt, Geometry};
pub use integrator::{StepOutcome, step};
pub use launch::{Gesture, drag_for_velocity, launch_velocity, trajectory_preview};
pub use level::{Course, CourseError, Goal, Level, Obstacle, Rect};
pub use opponent::opponent_shot;
pub use state::{GameEvent, MatchState, Mode, Outcome, Phase, Player, ResetReason, StatusMessage};
pub use tick::{Session, TickInput};
