/// Fixed timestep accumulator, in milliseconds.
/// Keeps simulation steps a constant size regardless of frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta per step.
    dt_ms: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
    /// Upper bound on steps per frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt_ms: f64, max_steps: u32) -> Self {
        Self {
            dt_ms,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: f64) -> u32 {
        if self.dt_ms <= 0.0 {
            return 0;
        }
        self.accumulator += frame_ms.max(0.0);
        // cap to avoid a spiral of death after a long stall
        self.accumulator = self.accumulator.min(self.dt_ms * self.max_steps as f64);
        let steps = (self.accumulator / self.dt_ms) as u32;
        self.accumulator -= steps as f64 * self.dt_ms;
        steps
    }

    /// Interpolation alpha between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        if self.dt_ms <= 0.0 {
            return 0.0;
        }
        self.accumulator / self.dt_ms
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }
}
