//! Score-rate plausibility guard
//!
//! Obstacles take tens of ticks to cross the screen, so a legitimate run can
//! only earn points so fast. A score climbing faster than the threshold means
//! the counter was tampered with from outside the tick loop. The guard is
//! deliberately weak: it judges the end state, not how it was reached.

use crate::consts::CHEAT_RATE_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateGuard {
    /// Maximum plausible points per second
    pub threshold: f64,
}

impl Default for RateGuard {
    fn default() -> Self {
        Self { threshold: CHEAT_RATE_THRESHOLD }
    }
}

impl RateGuard {
    /// True when the score is rising implausibly fast. Exceeding means
    /// strictly above the threshold; sitting exactly on it passes.
    pub fn exceeded(&self, score: u32, elapsed_secs: f64) -> bool {
        elapsed_secs > 0.0 && score as f64 / elapsed_secs > self.threshold
    }
}
