//! Manager configuration

use std::time::Duration;

/// Manager configuration options
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Fixed delay between worker loop iterations
    ///
    /// Bounds resource consumption and stop latency. A policy knob, not a
    /// correctness requirement.
    pub pacing: Duration,

    /// Maximum concurrently running streams (0 = unlimited)
    pub max_streams: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(1),
            max_streams: 0, // Unlimited
        }
    }
}

impl ManagerConfig {
    /// Set the pacing delay
    pub fn pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the running-stream limit
    pub fn max_streams(mut self, max: usize) -> Self {
        self.max_streams = max;
        self
    }
}
