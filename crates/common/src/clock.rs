//! Tick pacing for fixed-cadence loops.
//!
//! The tracking loop enforces a minimum delay between ticks, but never
//! pipelines work: when a tick takes longer than the minimum interval the
//! next tick starts as soon as the current one finishes. The effective tick
//! period is therefore `max(tick_work, min_interval)`.

use std::time::{Duration, Instant};

/// Computes how long a loop should sleep after each tick.
#[derive(Debug, Clone, Copy)]
pub struct TickPacer {
    min_interval: Duration,
}

impl TickPacer {
    /// Create a pacer enforcing the given minimum tick interval.
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Create a pacer from a millisecond interval.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Remaining delay for a tick that has already run for `elapsed`.
    pub fn remaining_after(&self, elapsed: Duration) -> Duration {
        self.min_interval.saturating_sub(elapsed)
    }

    /// Remaining delay for a tick that started at `tick_started`.
    pub fn remaining_since(&self, tick_started: Instant) -> Duration {
        self.remaining_after(tick_started.elapsed())
    }

    /// Sleep out the rest of the tick interval, if any.
    ///
    /// Returns the duration actually requested from the OS.
    pub fn pace(&self, tick_started: Instant) -> Duration {
        let remaining = self.remaining_since(tick_started);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        remaining
    }

    /// Minimum interval between tick starts.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
