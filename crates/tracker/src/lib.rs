//! GazeTrack Tracker
//!
//! Runs the gaze tracking pipeline on a dedicated background thread and
//! exposes the smoothed direction to any number of concurrent readers:
//!
//! ```text
//! capture → mirror → detector → SampleHistory → DirectionSmoother → DirectionStore → readers
//! ```
//!
//! The host application constructs a [`GazeTracker`], hands it a capture
//! source and a detector in [`GazeTracker::start`], reads with
//! [`GazeTracker::get_direction`], and shuts down with [`GazeTracker::stop`].
//! Shutdown always runs stop → join → release, so the capture device is
//! released exactly once and only after the loop has exited.

pub mod backends;
pub mod detector;
pub mod store;
pub mod tracking_loop;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use gazetrack_capture::CaptureSource;
use gazetrack_common::config::TrackingConfig;
use gazetrack_common::error::{GazeError, GazeResult};
use gazetrack_gaze_model::{Direction, Frame};

pub use store::{DirectionSnapshot, DirectionStore};
pub use tracking_loop::{LoopStats, TickOutcome, TrackingLoop};

/// Trait for target detectors.
///
/// Implementations receive frames already mirrored left-right and return
/// the target's offset from the frame center, normalized by half the frame
/// size. `Ok(None)` means no target in this frame.
pub trait Detector: Send {
    fn detect(&mut self, frame: &Frame) -> GazeResult<Option<Direction>>;

    /// Detector name for logging.
    fn name(&self) -> &str;
}

type WorkerHandle = JoinHandle<(Box<dyn CaptureSource>, LoopStats)>;

/// Host-owned tracker with an explicit start/stop lifecycle.
///
/// Share it by reference (or `Arc`) between the code that owns the
/// lifecycle and the request layer; readers never wait on the loop.
pub struct GazeTracker {
    config: TrackingConfig,
    store: Arc<DirectionStore>,
    stop_flag: Arc<AtomicBool>,
    worker: Mutex<Option<WorkerHandle>>,
}

impl GazeTracker {
    /// Create a stopped tracker.
    pub fn new(config: TrackingConfig) -> GazeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: Arc::new(DirectionStore::new()),
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        })
    }

    /// Spawn the tracking loop on its own thread.
    ///
    /// Fails if a loop is already running. A stopped tracker may be started
    /// again; the new loop begins with empty history.
    pub fn start(
        &self,
        capture: Box<dyn CaptureSource>,
        detector: Box<dyn Detector>,
    ) -> GazeResult<()> {
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return Err(GazeError::tracker("Tracker already running"));
        }

        self.stop_flag.store(false, Ordering::SeqCst);
        let tracking = TrackingLoop::new(capture, detector, Arc::clone(&self.store), &self.config);
        let stop_flag = Arc::clone(&self.stop_flag);

        let handle = std::thread::Builder::new()
            .name("gaze-tracking".to_string())
            .spawn(move || tracking.run(&stop_flag))?;

        *worker = Some(handle);
        tracing::info!("Gaze tracker started");
        Ok(())
    }

    /// Stop the loop, wait for it to exit, then release the capture source.
    ///
    /// Idempotent: returns the final loop statistics on the call that
    /// performed the shutdown and `None` otherwise. Concurrent callers wait
    /// for the in-progress shutdown. Release failures are logged, not raised.
    pub fn stop(&self) -> Option<LoopStats> {
        let mut worker = self.lock_worker();
        self.stop_flag.store(true, Ordering::SeqCst);

        let handle = worker.take()?;
        tracing::info!("Stopping gaze tracker");

        match handle.join() {
            Ok((mut capture, stats)) => {
                match capture.release() {
                    Ok(()) => tracing::info!(source = %capture.name(), "Capture released"),
                    Err(e) => {
                        tracing::warn!(source = %capture.name(), error = %e, "Capture release failed")
                    }
                }
                tracing::info!(ticks = stats.ticks, published = stats.published, "Gaze tracker stopped");
                Some(stats)
            }
            Err(_) => {
                tracing::error!("Tracking loop panicked; capture source was dropped during unwind");
                None
            }
        }
    }

    /// Latest smoothed direction. Never blocks on the tracking loop.
    pub fn get_direction(&self) -> Direction {
        self.store.read()
    }

    /// Latest smoothed direction with its publish sequence number.
    pub fn snapshot(&self) -> DirectionSnapshot {
        self.store.snapshot()
    }

    /// Read-only handle for request-layer workers.
    pub fn store(&self) -> Arc<DirectionStore> {
        Arc::clone(&self.store)
    }

    /// Whether a loop has been started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.lock_worker().is_some()
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    fn lock_worker(&self) -> std::sync::MutexGuard<'_, Option<WorkerHandle>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for GazeTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
