//! Bounded history of raw detections with a recency-weighted average.

use std::collections::VecDeque;

use gazetrack_common::config::TrackingConfig;
use gazetrack_gaze_model::{Direction, RawSample};

/// Default number of detections kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// Default number of detections required before averaging.
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Bounded FIFO of recent detections, oldest first.
///
/// Only real detections are stored; absent samples never enter the buffer.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<Direction>,
    capacity: usize,
    min_samples: usize,
}

impl SampleHistory {
    /// Create an empty history. `capacity` and `min_samples` are raised to 1.
    pub fn new(capacity: usize, min_samples: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            min_samples: min_samples.max(1),
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.history_capacity, config.min_samples)
    }

    /// Record one tick's detector output.
    ///
    /// Absent samples leave the history untouched. When full, the oldest
    /// detection is evicted before the new one is appended.
    pub fn push(&mut self, sample: RawSample) {
        let Some(direction) = sample else {
            return;
        };
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(direction);
    }

    /// Exponentially weighted mean of the buffered detections.
    ///
    /// Returns `None` until `min_samples` detections are buffered. Position
    /// `i` (0 = oldest) of `n` gets weight `exp(i / (n - 1))`, normalized to
    /// sum to one, so the newest sample weighs `e` times the oldest.
    pub fn weighted_average(&self) -> Option<Direction> {
        let n = self.samples.len();
        if n < self.min_samples || n == 0 {
            return None;
        }

        let weights = ramp_weights(n);
        let total: f64 = weights.iter().sum();

        let (sum_dx, sum_dy) = self
            .samples
            .iter()
            .zip(&weights)
            .fold((0.0, 0.0), |(sx, sy), (s, w)| (sx + w * s.dx, sy + w * s.dy));

        Some(Direction::new(sum_dx / total, sum_dy / total))
    }

    /// Buffered detections, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_MIN_SAMPLES)
    }
}

/// Unnormalized weights `exp(linspace(0, 1, n))`.
fn ramp_weights(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let last = (n - 1) as f64;
    (0..n).map(|i| (i as f64 / last).exp()).collect()
}
