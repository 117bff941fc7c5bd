//! Data-driven physics tuning
//!
//! Every numeric constant the simulation reads lives in [`Tuning`]. Two
//! presets cover the flat court (pixels) and the cup room (metres); a JSON
//! file can override any subset of fields on top of a preset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{NOMINAL_FPS, TOURNAMENT_ROUNDS};

/// Errors raised while loading or validating tuning
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Physics and pacing constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Ball collision radius
    pub ball_radius: f32,
    /// Post-bounce vertical speed below which the ball settles
    pub settle_speed: f32,
    /// Multiplier for velocity-based (fling) gestures
    pub fling_scale: f32,
    /// Multiplier for displacement-based (drag) gestures
    pub drag_scale: f32,
    /// Upward launch speed per unit of horizontal launch speed (spatial only)
    pub lift_ratio: f32,
    /// Flight time the opponent solves its shot for (seconds)
    pub opponent_flight_time: f32,
    /// Delay between turn handover and the opponent's launch (seconds)
    pub opponent_delay: f32,
    /// Rounds per tournament
    pub tournament_rounds: u32,
    /// Largest frame delta fed to the integrator (seconds)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::flat()
    }
}

impl Tuning {
    /// Flat court preset. Per-frame constants scaled to seconds at 60 Hz.
    pub fn flat() -> Self {
        Self {
            gravity: 0.6 * NOMINAL_FPS * NOMINAL_FPS,
            ball_radius: 20.0,
            settle_speed: NOMINAL_FPS,
            fling_scale: 30.0 * NOMINAL_FPS,
            drag_scale: 0.2 * NOMINAL_FPS,
            lift_ratio: 0.0,
            opponent_flight_time: 30.0 / NOMINAL_FPS,
            opponent_delay: 0.5,
            tournament_rounds: TOURNAMENT_ROUNDS,
            max_frame_dt: 0.1,
        }
    }

    /// Cup room preset (metres)
    pub fn spatial() -> Self {
        Self {
            gravity: 9.81,
            ball_radius: 0.1,
            settle_speed: 0.1,
            fling_scale: 4.0,
            drag_scale: 0.02,
            lift_ratio: 0.8,
            opponent_flight_time: 1.5,
            opponent_delay: 0.5,
            tournament_rounds: TOURNAMENT_ROUNDS,
            max_frame_dt: 0.1,
        }
    }

    /// Apply a JSON object of overrides on top of `base`
    pub fn from_json_with(base: &Tuning, json: &str) -> Result<Self, TuningError> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;

        match (&mut merged, overrides) {
            (Value::Object(fields), Value::Object(over)) => {
                for (key, value) in over {
                    fields.insert(key, value);
                }
            }
            _ => {
                return Err(TuningError::Invalid {
                    field: "<root>",
                    reason: "expected a json object",
                });
            }
        }

        let tuning: Tuning = serde_json::from_value(merged)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load overrides from a JSON file on top of `base`
    pub fn load(path: impl AsRef<Path>, base: &Tuning) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        match Self::from_json_with(base, &json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                Ok(tuning)
            }
            Err(e) => {
                log::warn!("Rejected tuning file {}: {e}", path.display());
                Err(e)
            }
        }
    }

    /// Check every field is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if !value.is_finite() {
                return Err(TuningError::Invalid { field, reason: "must be finite" });
            }
            if value <= 0.0 {
                return Err(TuningError::Invalid { field, reason: "must be positive" });
            }
            Ok(())
        }

        positive("gravity", self.gravity)?;
        positive("ball_radius", self.ball_radius)?;
        positive("settle_speed", self.settle_speed)?;
        positive("fling_scale", self.fling_scale)?;
        positive("drag_scale", self.drag_scale)?;
        positive("opponent_flight_time", self.opponent_flight_time)?;
        positive("max_frame_dt", self.max_frame_dt)?;

        if !self.lift_ratio.is_finite() || self.lift_ratio < 0.0 {
            return Err(TuningError::Invalid {
                field: "lift_ratio",
                reason: "must be finite and non-negative",
            });
        }
        if !self.opponent_delay.is_finite() || self.opponent_delay < 0.0 {
            return Err(TuningError::Invalid {
                field: "opponent_delay",
                reason: "must be finite and non-negative",
            });
        }
        if self.tournament_rounds == 0 {
            return Err(TuningError::Invalid {
                field: "tournament_rounds",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
