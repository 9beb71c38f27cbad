//! World distance bookkeeping

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceClock {
    /// Cumulative distance (drives difficulty and boss thresholds)
    pub distance: f32,
    /// Seconds of gameplay elapsed
    pub elapsed: f32,
}

impl DistanceClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick, returning the scrolled amount (`speed * dt`).
    /// A non-positive `dt` is a no-op.
    pub fn advance(&mut self, dt: f32, speed: f32, distance_factor: f32) -> f32 {
        if dt <= 0.0 {
            return 0.0;
        }
        let scrolled = speed * dt;
        self.distance += distance_factor * scrolled;
        self.elapsed += dt;
        scrolled
    }
}
