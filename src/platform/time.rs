//! Frame clock
//!
//! Converts the absolute timestamps delivered by a display-refresh callback
//! into the elapsed `dt` the simulation consumes.

/// Elapsed-time tracker for a frame-driven loop
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_time: None }
    }

    /// Record a frame timestamp (seconds) and return the delta since the
    /// previous one. The first tick after construction or [`reset`] yields
    /// zero, as does any non-finite or backwards timestamp.
    ///
    /// [`reset`]: FrameClock::reset
    pub fn tick(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            return 0.0;
        }
        let dt = match self.last_time {
            Some(last) if now > last => (now - last) as f32,
            _ => 0.0,
        };
        self.last_time = Some(now);
        dt
    }

    /// Forget the previous timestamp (new run / resumed loop)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}
