//! Live webcam capture through an `ffmpeg` child process.
//!
//! `ffmpeg` opens the Video4Linux device and writes raw `bgr24` frames to
//! stdout; each `read` consumes exactly one frame. The child is killed and
//! reaped on `release` (or on drop if never released).

use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};

use gazetrack_common::config::CameraConfig;
use gazetrack_common::error::{GazeError, GazeResult};
use gazetrack_gaze_model::Frame;

use crate::device::command_exists;
use crate::CaptureSource;

const CHANNELS: u8 = 3;

pub struct WebcamCapture {
    config: CameraConfig,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
}

impl WebcamCapture {
    /// Start streaming from the configured camera.
    pub fn open(config: CameraConfig) -> GazeResult<Self> {
        if !command_exists("ffmpeg") {
            return Err(GazeError::capture("ffmpeg not found in PATH"));
        }

        let device = config.device_path();
        if !device.exists() {
            return Err(GazeError::capture(format!(
                "Camera device {} does not exist",
                device.display()
            )));
        }

        let size = format!("{}x{}", config.width, config.height);
        let fps = config.fps.to_string();
        let device_arg = device.to_string_lossy().into_owned();

        let mut child = Command::new("ffmpeg")
            .args([
                "-loglevel",
                "error",
                "-nostats",
                "-fflags",
                "nobuffer",
                "-flags",
                "low_delay",
                "-f",
                "video4linux2",
                "-video_size",
                &size,
                "-framerate",
                &fps,
                "-i",
                &device_arg,
                "-f",
                "rawvideo",
                "-pix_fmt",
                "bgr24",
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GazeError::capture(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GazeError::capture("ffmpeg stdout was not captured"))?;

        tracing::info!(
            device = %device.display(),
            width = config.width,
            height = config.height,
            fps = config.fps,
            "Webcam capture started"
        );

        Ok(Self {
            config,
            child: Some(child),
            stdout: Some(stdout),
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl CaptureSource for WebcamCapture {
    fn read(&mut self) -> GazeResult<Frame> {
        let stdout = self
            .stdout
            .as_mut()
            .ok_or_else(|| GazeError::capture("Webcam already released"))?;

        let mut data = vec![0; self.config.frame_len()];
        stdout
            .read_exact(&mut data)
            .map_err(|e| GazeError::capture(format!("Failed to read frame: {e}")))?;

        Frame::new(self.config.width, self.config.height, CHANNELS, data)
            .map_err(|e| GazeError::capture(e.to_string()))
    }

    fn release(&mut self) -> GazeResult<()> {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // ffmpeg may already have exited if the device went away.
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "ffmpeg kill failed");
        }
        let status = child
            .wait()
            .map_err(|e| GazeError::capture(format!("Failed to reap ffmpeg: {e}")))?;
        tracing::info!(%status, "Webcam capture released");
        Ok(())
    }

    fn name(&self) -> &str {
        "webcam"
    }
}

impl Drop for WebcamCapture {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
