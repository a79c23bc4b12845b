//! Time management utilities

/// Largest delta a single frame may feed the simulation, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Clamp a raw frame delta into `[0, max_delta]`
///
/// Negative and non-finite deltas collapse to zero so a bad timestamp can
/// never rewind the simulation.
pub fn clamp_delta(raw: f32, max_delta: f32) -> f32 {
    if raw.is_finite() && raw > 0.0 {
        raw.min(max_delta)
    } else {
        0.0
    }
}

/// Per-frame clock driving the session
///
/// Wall-clock deltas are capped so a suspended tab or a debugger pause
/// does not teleport every target past the camera in one step.
#[derive(Debug)]
pub struct FrameClock {
    total_time: f32,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}

impl FrameClock {
    /// Create a new clock with the given delta cap
    pub fn new(max_delta: f32) -> Self {
        Self {
            total_time: 0.0,
            max_delta,
        }
    }

    /// Feed an externally measured delta and return the capped value
    pub fn advance_by(&mut self, raw: f32) -> f32 {
        let delta = clamp_delta(raw, self.max_delta);
        self.total_time += delta;
        delta
    }

    /// Get the total simulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
}
