//! Launch controller
//!
//! Maps a released screen-space gesture to the ball's initial velocity.
//! Screen space is y-down; the world is y-up.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::Dimension;
use crate::tuning::Tuning;

/// A released (or in-progress) pointer gesture in screen units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Pointer release velocity; the ball follows the flick
    Fling { vx: f32, vy: f32 },
    /// Drag displacement from press to release; the ball goes the other way
    Drag { dx: f32, dy: f32 },
}

impl Gesture {
    /// Screen-space throw vector (y-down) after scaling
    fn throw(&self, tuning: &Tuning) -> Vec2 {
        match *self {
            Gesture::Fling { vx, vy } => Vec2::new(vx, vy) * tuning.fling_scale,
            Gesture::Drag { dx, dy } => -Vec2::new(dx, dy) * tuning.drag_scale,
        }
    }
}

/// Initial velocity for `gesture`
///
/// Flat: screen x maps to world x, screen y is flipped onto world y.
/// Spatial: screen x maps to world x, screen y to world z (down the screen
/// is toward the viewer), plus an upward component proportional to the
/// horizontal speed. Non-finite gestures yield `None`.
pub fn launch_velocity(gesture: &Gesture, dimension: Dimension, tuning: &Tuning) -> Option<Vec3> {
    let throw = gesture.throw(tuning);
    if !throw.is_finite() {
        return None;
    }
    Some(match dimension {
        Dimension::Flat => Vec3::new(throw.x, -throw.y, 0.0),
        Dimension::Spatial => Vec3::new(throw.x, throw.length() * tuning.lift_ratio, throw.y),
    })
}

/// Drag gesture reproducing `vel` as closely as the mapping allows.
///
/// Flat launches are matched exactly. Spatial launches match the horizontal
/// component; the vertical one follows from the lift ratio.
pub fn drag_for_velocity(vel: Vec3, dimension: Dimension, tuning: &Tuning) -> Gesture {
    let throw = match dimension {
        Dimension::Flat => Vec2::new(vel.x, -vel.y),
        Dimension::Spatial => Vec2::new(vel.x, vel.z),
    };
    let d = -throw / tuning.drag_scale;
    Gesture::Drag { dx: d.x, dy: d.y }
}

/// Ballistic position after `t` seconds (no collisions)
pub fn ballistic_position(start: Vec3, vel: Vec3, gravity: f32, t: f32) -> Vec3 {
    start + vel * t - Vec3::Y * (0.5 * gravity * t * t)
}

/// Sample a launch arc for an aim line: `points` positions spaced `interval`
/// seconds apart, starting at `start`.
pub fn trajectory_preview(
    start: Vec3,
    vel: Vec3,
    gravity: f32,
    interval: f32,
    points: usize,
) -> Vec<Vec3> {
    (0..points)
        .map(|i| ballistic_position(start, vel, gravity, i as f32 * interval))
        .collect()
}
