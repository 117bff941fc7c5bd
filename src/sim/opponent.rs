//! Opponent (PC) shot
//!
//! Closed-form projectile solution from the level start to the goal centre
//! in a fixed flight time. Obstacles are not considered.

use glam::Vec3;

use super::level::Level;
use crate::tuning::Tuning;

/// Launch velocity that reaches `goal` from `start` after exactly
/// `flight_time` seconds of free fall under `gravity`.
pub fn opponent_velocity(start: Vec3, goal: Vec3, flight_time: f32, gravity: f32) -> Vec3 {
    let mut vel = (goal - start) / flight_time;
    // Raise the arc by the distance gravity pulls it down during the flight
    vel.y += gravity * flight_time / 2.0;
    vel
}

/// The PC's shot for `level`
pub fn opponent_shot(level: &Level, tuning: &Tuning) -> Vec3 {
    opponent_velocity(
        level.start,
        level.goal.center(),
        tuning.opponent_flight_time,
        tuning.gravity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::launch::ballistic_position;
    use crate::sim::level::Course;
    use proptest::prelude::*;

    #[test]
    fn test_flat_shot_reaches_goal() {
        let tuning = Tuning::flat();
        let level = Course::flat().level(1).clone();
        let vel = opponent_shot(&level, &tuning);

        assert_eq!(vel.z, 0.0);
        let landed = ballistic_position(level.start, vel, tuning.gravity, tuning.opponent_flight_time);
        assert!((landed - level.goal.center()).length() < 1e-2);
    }

    #[test]
    fn test_spatial_shot_reaches_cup() {
        let tuning = Tuning::spatial();
        let level = Course::cup_room().level(0).clone();
        let vel = opponent_shot(&level, &tuning);

        let landed = ballistic_position(level.start, vel, tuning.gravity, tuning.opponent_flight_time);
        assert!((landed - level.goal.center()).length() < 1e-3);
        assert!(level.goal.captures(landed));
    }

    proptest! {
        #[test]
        fn prop_opponent_lands_on_goal(
            x0 in -500.0f32..500.0, y0 in -500.0f32..500.0,
            x1 in -500.0f32..500.0, y1 in -500.0f32..500.0,
            t in 0.2f32..3.0,
            g in 1.0f32..3000.0,
        ) {
            let start = Vec3::new(x0, y0, 0.0);
            let goal = Vec3::new(x1, y1, 0.0);
            let vel = opponent_velocity(start, goal, t, g);
            let landed = ballistic_position(start, vel, g, t);

            let scale = 1.0 + g * t * t + start.abs().max_element() + goal.abs().max_element();
            prop_assert!((landed - goal).length() <= scale * 1e-5);
        }
    }
}
