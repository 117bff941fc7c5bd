//! Physics Ball - a gravity puzzle where a ball is flung toward a goal
//!
//! Core modules:
//! - `sim`: Simulation core (integrator, collisions, launch, opponent, turns)
//! - `platform`: Frame clock abstraction
//! - `tuning`: Data-driven physics constants

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh the per-frame constants were tuned at
    pub const NOMINAL_FPS: f32 = 60.0;

    /// Flat court dimensions (pixels, y-up, origin bottom-left)
    pub const COURT_WIDTH: f32 = 400.0;
    pub const COURT_HEIGHT: f32 = 800.0;

    /// Cup room half extents (metres, floor at y = 0, centred on the origin)
    pub const ROOM_HALF_WIDTH: f32 = 2.0;
    pub const ROOM_HALF_DEPTH: f32 = 3.0;

    /// Restitution per ball kind
    pub const BOUNCY_RESTITUTION: f32 = 0.9;
    pub const HEAVY_RESTITUTION: f32 = 0.2;

    /// Rounds in a tournament (one human + one PC shot each)
    pub const TOURNAMENT_ROUNDS: u32 = 3;
}

/// Dimensionality of a simulation. Flat sessions keep z at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Dimension {
    Flat,
    Spatial,
}

/// Ground-plane (x, z) projection of a world position
#[inline]
pub fn ground(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Sanitize a frame delta: negative or non-finite values become zero
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
