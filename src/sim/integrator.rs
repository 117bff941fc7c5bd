//! Ball integrator
//!
//! Semi-implicit Euler: gravity updates the vertical velocity first, the
//! position then advances with the new velocity, and the geometry resolves
//! contacts. No sub-stepping; thin geometry can be tunneled at high speed.

use super::ball::Ball;
use super::collision::{Contact, Geometry};
use super::level::Level;
use crate::sanitize_dt;
use crate::tuning::Tuning;
use glam::Vec3;

/// What one integration step did to the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Ball was resting; nothing happened
    Resting,
    /// Ball is still in flight
    Flying(Contact),
    /// A floor bounce brought the ball to rest
    Settled,
    /// Ball entered the goal and was snapped to `at`
    Captured { at: Vec3 },
}

/// Advance `ball` by `dt` seconds against `level` using `geometry`.
///
/// A resting ball is left untouched. A zero (or invalid) `dt` performs no
/// motion and no collision work.
pub fn step<G: Geometry + ?Sized>(
    ball: &mut Ball,
    dt: f32,
    geometry: &G,
    level: &Level,
    restitution: f32,
    tuning: &Tuning,
) -> StepOutcome {
    if !ball.launched() {
        return StepOutcome::Resting;
    }
    let dt = sanitize_dt(dt);
    if dt == 0.0 {
        return StepOutcome::Flying(Contact::default());
    }

    ball.vel.y -= tuning.gravity * dt;
    ball.pos += ball.vel * dt;

    let contact = geometry.resolve(level, ball, restitution, tuning);
    if contact.settled {
        log::trace!("ball settled at {:?}", ball.pos);
        return StepOutcome::Settled;
    }

    if level.goal.captures(ball.pos) {
        let at = level.goal.center();
        ball.place(at);
        return StepOutcome::Captured { at };
    }

    StepOutcome::Flying(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallState;
    use crate::sim::collision::{CupRoom, FlatCourt};
    use crate::sim::level::{Course, Goal};
    use glam::Vec2;

    fn flat_open_level() -> Level {
        Course::flat().level(1).clone()
    }

    #[test]
    fn test_resting_ball_is_untouched() {
        let tuning = Tuning::flat();
        let level = flat_open_level();
        let mut ball = Ball::at_rest(Vec3::new(60.0, 100.0, 0.0));
        let before = ball.clone();

        for _ in 0..2 {
            let outcome = step(&mut ball, 1.0 / 60.0, &FlatCourt::default(), &level, 0.9, &tuning);
            assert_eq!(outcome, StepOutcome::Resting);
            assert_eq!(ball, before);
        }
    }

    #[test]
    fn test_zero_and_invalid_dt_do_not_move() {
        let tuning = Tuning::flat();
        let level = flat_open_level();
        let mut ball = Ball::at_rest(Vec3::new(60.0, 100.0, 0.0));
        ball.launch(Vec3::new(100.0, 100.0, 0.0));
        let before = ball.clone();

        for dt in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            step(&mut ball, dt, &FlatCourt::default(), &level, 0.9, &tuning);
            assert_eq!(ball, before);
        }
    }

    #[test]
    fn test_semi_implicit_order() {
        let tuning = Tuning::flat();
        let level = flat_open_level();
        let mut ball = Ball::at_rest(Vec3::new(100.0, 300.0, 0.0));
        ball.launch(Vec3::new(60.0, 0.0, 0.0));

        let dt = 0.1;
        step(&mut ball, dt, &FlatCourt::default(), &level, 0.9, &tuning);

        let vy = -tuning.gravity * dt;
        assert!((ball.vel.y - vy).abs() < 1e-3);
        // Position uses the already-updated velocity
        assert!((ball.pos.y - (300.0 + vy * dt)).abs() < 1e-3);
        assert!((ball.pos.x - 106.0).abs() < 1e-4);
    }

    #[test]
    fn test_capture_snaps_to_goal_center() {
        let tuning = Tuning::flat();
        let level = flat_open_level();
        let center = level.goal.center();
        // One frame away from the goal centre, moving slowly
        let mut ball = Ball::at_rest(center - Vec3::new(1.0, 0.0, 0.0));
        ball.launch(Vec3::new(60.0, 0.0, 0.0));

        let outcome = step(&mut ball, 1.0 / 60.0, &FlatCourt::default(), &level, 0.9, &tuning);
        assert_eq!(outcome, StepOutcome::Captured { at: center });
        assert_eq!(ball.pos, center);
        assert_eq!(ball.state, BallState::Resting);
        assert_eq!(ball.vel, Vec3::ZERO);
    }

    #[test]
    fn test_drop_eventually_settles() {
        let tuning = Tuning::flat();
        let level = flat_open_level();
        let mut ball = Ball::at_rest(Vec3::new(100.0, 300.0, 0.0));
        ball.launch(Vec3::ZERO);

        let mut settled = false;
        for _ in 0..10_000 {
            match step(&mut ball, 1.0 / 60.0, &FlatCourt::default(), &level, 0.9, &tuning) {
                StepOutcome::Settled => {
                    settled = true;
                    break;
                }
                StepOutcome::Flying(_) => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert!(settled);
        assert_eq!(ball.pos.y, tuning.ball_radius);
        assert!(!ball.launched());
    }

    #[test]
    fn test_spatial_drop_into_cup() {
        let tuning = Tuning::spatial();
        let level = Level {
            start: Vec3::new(0.0, 0.1, 2.0),
            goal: Goal::Cup {
                base: Vec2::new(0.0, -1.0),
                radius: 0.3,
                rim_height: 0.25,
            },
            obstacles: Vec::new(),
        };
        let mut ball = Ball::at_rest(Vec3::new(0.0, 1.5, -1.0));
        ball.launch(Vec3::ZERO);

        let mut outcome = StepOutcome::Resting;
        for _ in 0..200 {
            outcome = step(&mut ball, 1.0 / 60.0, &CupRoom::default(), &level, 0.9, &tuning);
            if !matches!(outcome, StepOutcome::Flying(_)) {
                break;
            }
        }
        assert_eq!(
            outcome,
            StepOutcome::Captured {
                at: Vec3::new(0.0, 0.125, -1.0)
            }
        );
    }
}
