/// Accumulator behind `UpdateType::Fixed` tweens.
/// Frame deltas are banked and paid out in whole fixed steps, so fixed
/// tweens advance at the same rate whatever the host frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Seconds per fixed step.
    dt: f32,
    /// Steps paid out per frame at most; the excess is dropped.
    max_steps: u32,
    /// Banked time not yet paid out.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt: if dt > 0.0 { dt } else { 1.0 / 60.0 },
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Bank `frame_dt` and return how many fixed steps are due.
    /// Negative deltas drain nothing and never make the bank negative.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt)
            .max(0.0)
            .min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Fraction of the next step already banked (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
