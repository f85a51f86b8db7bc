//! The fixed-cadence capture → detect → smooth → publish loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use gazetrack_capture::CaptureSource;
use gazetrack_common::clock::TickPacer;
use gazetrack_common::config::TrackingConfig;
use gazetrack_gaze_model::{Direction, Frame, RawSample};
use gazetrack_smoothing::{DirectionSmoother, SampleHistory};
use serde::Serialize;

use crate::store::DirectionStore;
use crate::Detector;

/// Counters accumulated over the lifetime of a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub ticks: u64,
    pub capture_failures: u64,
    pub detections: u64,
    pub misses: u64,
    pub detector_errors: u64,
    pub published: u64,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The frame read failed; nothing was mutated or published.
    CaptureFailed,
    /// A direction was published.
    Published {
        /// Whether the detector found a target this tick.
        detected: bool,
        direction: Direction,
    },
}

/// Sole owner and writer of the sampling and smoothing state.
pub struct TrackingLoop {
    capture: Box<dyn CaptureSource>,
    detector: Box<dyn Detector>,
    history: SampleHistory,
    smoother: DirectionSmoother,
    store: Arc<DirectionStore>,
    pacer: TickPacer,
    stats: LoopStats,
    failure_streak: u64,
}

impl TrackingLoop {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        detector: Box<dyn Detector>,
        store: Arc<DirectionStore>,
        config: &TrackingConfig,
    ) -> Self {
        Self {
            capture,
            detector,
            history: SampleHistory::from_config(config),
            smoother: DirectionSmoother::from_config(config),
            store,
            pacer: TickPacer::from_millis(config.tick_delay_ms),
            stats: LoopStats::default(),
            failure_streak: 0,
        }
    }

    /// Run one capture → detect → smooth → publish pass. Never fails.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let frame = match self.capture.read() {
            Ok(frame) => frame,
            Err(e) => {
                self.stats.capture_failures += 1;
                self.failure_streak += 1;
                if self.failure_streak == 1 {
                    tracing::warn!(source = %self.capture.name(), error = %e, "Capture read failed");
                } else {
                    tracing::debug!(streak = self.failure_streak, error = %e, "Capture still failing");
                }
                return TickOutcome::CaptureFailed;
            }
        };

        if self.failure_streak > 0 {
            tracing::info!(failed_reads = self.failure_streak, "Capture recovered");
            self.failure_streak = 0;
        }

        // Mirror so positive dx is the user's right, not the camera's.
        let frame = frame.mirrored();
        let sample = self.detect(&frame);

        self.history.push(sample);
        if let Some(average) = self.history.weighted_average() {
            self.smoother.observe_raw(average);
        }
        let direction = self.smoother.advance();

        let sequence = self.store.write(direction);
        self.stats.published += 1;
        tracing::trace!(sequence, dx = direction.dx, dy = direction.dy, "Published direction");

        TickOutcome::Published {
            detected: sample.is_some(),
            direction,
        }
    }

    /// Tick until `stop` is set, then hand back the capture source.
    ///
    /// The flag is checked once per tick; an in-flight tick always completes.
    pub fn run(mut self, stop: &AtomicBool) -> (Box<dyn CaptureSource>, LoopStats) {
        tracing::info!(
            capture = %self.capture.name(),
            detector = %self.detector.name(),
            tick_delay_ms = self.pacer.min_interval().as_millis() as u64,
            "Tracking loop started"
        );

        while !stop.load(Ordering::Acquire) {
            let started = Instant::now();
            self.tick();
            self.pacer.pace(started);
        }

        tracing::info!(
            ticks = self.stats.ticks,
            detections = self.stats.detections,
            capture_failures = self.stats.capture_failures,
            "Tracking loop stopped"
        );
        (self.capture, self.stats)
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn smoother(&self) -> &DirectionSmoother {
        &self.smoother
    }

    /// Ask the detector for this frame's sample, folding failures into a miss.
    fn detect(&mut self, frame: &Frame) -> RawSample {
        let sample = match self.detector.detect(frame) {
            Ok(Some(direction)) if direction.is_finite() => Some(direction),
            Ok(Some(direction)) => {
                tracing::warn!(dx = direction.dx, dy = direction.dy, "Discarding non-finite detection");
                None
            }
            Ok(None) => None,
            Err(e) => {
                self.stats.detector_errors += 1;
                tracing::warn!(detector = %self.detector.name(), error = %e, "Detector failed");
                None
            }
        };

        if sample.is_some() {
            self.stats.detections += 1;
        } else {
            self.stats.misses += 1;
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ScriptedDetector;
    use gazetrack_capture::ScriptedCapture;
    use gazetrack_common::error::{GazeError, GazeResult};

    fn make_loop(
        capture: ScriptedCapture,
        detector: impl Detector + 'static,
    ) -> (TrackingLoop, Arc<DirectionStore>) {
        let store = Arc::new(DirectionStore::new());
        let tracking = TrackingLoop::new(
            Box::new(capture),
            Box::new(detector),
            Arc::clone(&store),
            &TrackingConfig::default(),
        );
        (tracking, store)
    }

    fn constant(dx: f64, dy: f64, ticks: usize) -> ScriptedDetector {
        ScriptedDetector::new(vec![Some(Direction::new(dx, dy)); ticks])
    }

    #[test]
    fn test_capture_failure_skips_tick() {
        let capture = ScriptedCapture::new(vec![None]);
        let (mut tracking, store) = make_loop(capture, constant(1.0, 1.0, 10));

        assert_eq!(tracking.tick(), TickOutcome::CaptureFailed);
        assert_eq!(store.snapshot().sequence, 0);
        assert!(tracking.history().is_empty());
        assert_eq!(tracking.stats().capture_failures, 1);
        assert_eq!(tracking.stats().published, 0);
    }

    #[test]
    fn test_no_movement_before_min_samples() {
        let (mut tracking, store) = make_loop(ScriptedCapture::blank(8, 8), constant(1.0, -1.0, 10));

        for _ in 0..4 {
            tracking.tick();
            assert_eq!(store.read(), Direction::CENTER);
        }
        assert_eq!(store.snapshot().sequence, 4);

        // Fifth detection produces the first target.
        tracking.tick();
        let d = store.read();
        assert!((d.dx - 0.2).abs() < 1e-9);
        assert!((d.dy + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_advancing_through_misses() {
        let mut samples = vec![Some(Direction::new(1.0, 0.0)); 5];
        samples.extend(vec![None; 3]);
        let (mut tracking, store) = make_loop(ScriptedCapture::blank(8, 8), ScriptedDetector::new(samples));

        for _ in 0..5 {
            tracking.tick();
        }
        let before = store.read().dx;
        let outcome = tracking.tick();
        assert!(matches!(outcome, TickOutcome::Published { detected: false, .. }));
        assert!(store.read().dx > before);
        assert_eq!(tracking.history().len(), 5);
    }

    #[test]
    fn test_exhaustion_flag_follows_last_publish() {
        let detector = constant(0.5, 0.5, 1);
        let exhausted = detector.exhausted_flag();
        let (mut tracking, store) = make_loop(ScriptedCapture::blank(8, 8), detector);

        tracking.tick();
        assert_eq!(store.snapshot().sequence, 1);
        assert!(!exhausted.load(Ordering::Acquire));

        tracking.tick();
        assert!(exhausted.load(Ordering::Acquire));
        assert_eq!(tracking.stats().detections, 1);
    }

    struct FailingDetector;

    impl Detector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> GazeResult<Option<Direction>> {
            Err(GazeError::detection("model not loaded"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_detector_error_counts_as_miss() {
        let (mut tracking, store) = make_loop(ScriptedCapture::blank(8, 8), FailingDetector);
        let outcome = tracking.tick();
        assert!(matches!(outcome, TickOutcome::Published { detected: false, .. }));
        assert_eq!(store.snapshot().sequence, 1);
        assert_eq!(tracking.stats().detector_errors, 1);
        assert_eq!(tracking.stats().misses, 1);
    }

    #[test]
    fn test_non_finite_detection_is_dropped() {
        let detector = ScriptedDetector::new(vec![Some(Direction::new(f64::NAN, 0.0)); 6]);
        let (mut tracking, store) = make_loop(ScriptedCapture::blank(8, 8), detector);
        for _ in 0..6 {
            tracking.tick();
        }
        assert!(tracking.history().is_empty());
        assert!(store.read().is_finite());
    }

    struct SideDetector;

    impl Detector for SideDetector {
        /// Reports dx = -1 when the first pixel is bright, +1 otherwise.
        fn detect(&mut self, frame: &Frame) -> GazeResult<Option<Direction>> {
            let bright = frame.pixel(0, 0).map(|p| p[0] > 0).unwrap_or(false);
            Ok(Some(Direction::new(if bright { -1.0 } else { 1.0 }, 0.0)))
        }

        fn name(&self) -> &str {
            "side"
        }
    }

    #[test]
    fn test_frames_are_mirrored_before_detection() {
        // Bright pixel on the camera's left edge ends up on the right.
        let mut data = vec![0u8; 4];
        data[0] = 255;
        let frame = Frame::new(4, 1, 1, data).unwrap();
        let capture = ScriptedCapture::new(vec![Some(frame); 5]);
        let (mut tracking, _store) = make_loop(capture, SideDetector);

        for _ in 0..5 {
            tracking.tick();
        }
        assert!(tracking.history().iter().all(|d| d.dx == 1.0));
    }

    #[test]
    fn test_run_exits_when_stop_already_set() {
        let (tracking, store) = make_loop(ScriptedCapture::blank(8, 8), constant(0.5, 0.5, 10));
        let stop = AtomicBool::new(true);
        let (_capture, stats) = tracking.run(&stop);
        assert_eq!(stats.ticks, 0);
        assert_eq!(store.snapshot().sequence, 0);
    }
}
