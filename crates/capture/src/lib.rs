//! GazeTrack Capture
//!
//! Frame sources for the tracking loop. A capture source is owned by
//! exactly one tracking loop, read synchronously once per tick, and
//! released once after the loop has stopped.
//!
//! - **Webcam:** Video4Linux device streamed through `ffmpeg`
//! - **Scripted:** pre-recorded read outcomes for tests and replay

pub mod device;
pub mod scripted;
pub mod webcam;

use gazetrack_common::error::GazeResult;
use gazetrack_gaze_model::Frame;

pub use scripted::{ReleaseCounter, ScriptedCapture};
pub use webcam::WebcamCapture;

/// Trait for frame sources.
pub trait CaptureSource: Send {
    /// Read the next frame. An error is a transient failure for this tick.
    fn read(&mut self) -> GazeResult<Frame>;

    /// Release the underlying device.
    fn release(&mut self) -> GazeResult<()>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
