//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time/ticks (display refresh callbacks to simulation deltas)

pub mod time;

pub use time::FrameClock;
