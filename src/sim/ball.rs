//! Ball kinds and kinematic state

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{BOUNCY_RESTITUTION, HEAVY_RESTITUTION};

/// Selectable ball variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BallKind {
    #[default]
    Bouncy,
    Heavy,
}

impl BallKind {
    pub const ALL: [BallKind; 2] = [BallKind::Bouncy, BallKind::Heavy];

    /// Fraction of speed kept (with reversed sign) along a collision axis
    pub fn restitution(&self) -> f32 {
        match self {
            BallKind::Bouncy => BOUNCY_RESTITUTION,
            BallKind::Heavy => HEAVY_RESTITUTION,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallKind::Bouncy => "bouncy",
            BallKind::Heavy => "heavy",
        }
    }
}

/// Resting or in flight; never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Ready for the next shot
    #[default]
    Resting,
    /// Launched and being integrated every frame
    InFlight,
}

/// The single ball of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    pub state: BallState,
}

impl Ball {
    /// A resting ball at `pos`
    pub fn at_rest(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            state: BallState::Resting,
        }
    }

    pub fn launched(&self) -> bool {
        self.state == BallState::InFlight
    }

    /// Put the ball in flight from its current position
    pub fn launch(&mut self, vel: Vec3) {
        self.vel = vel;
        self.state = BallState::InFlight;
    }

    /// Stop the ball where it is
    pub fn settle(&mut self) {
        self.vel = Vec3::ZERO;
        self.state = BallState::Resting;
    }

    /// Move the ball to `pos` and stop it
    pub fn place(&mut self, pos: Vec3) {
        self.pos = pos;
        self.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restitution_in_range() {
        for kind in BallKind::ALL {
            let e = kind.restitution();
            assert!(e > 0.0 && e <= 1.0, "{} restitution {e}", kind.as_str());
        }
        assert!(BallKind::Bouncy.restitution() > BallKind::Heavy.restitution());
    }

    #[test]
    fn test_launch_and_place() {
        let mut ball = Ball::at_rest(Vec3::new(60.0, 100.0, 0.0));
        assert!(!ball.launched());

        ball.launch(Vec3::new(10.0, 20.0, 0.0));
        assert!(ball.launched());
        assert_eq!(ball.vel, Vec3::new(10.0, 20.0, 0.0));

        ball.place(Vec3::new(1.0, 2.0, 0.0));
        assert!(!ball.launched());
        assert_eq!(ball.vel, Vec3::ZERO);
        assert_eq!(ball.pos, Vec3::new(1.0, 2.0, 0.0));
    }
}
