/// Fixed timestep accumulator.
/// Scene `update` and the physics step both run at `dt`, whatever the frame rate.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    /// Upper bound on steps per frame, so a long stall (tab in background)
    /// does not turn into hundreds of catch-up steps.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Drop any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
