//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{GazeError, GazeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sampling and smoothing parameters.
    pub tracking: TrackingConfig,

    /// Camera capture parameters.
    pub camera: CameraConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters of the sampling-and-smoothing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Maximum number of raw samples kept for the weighted average.
    pub history_capacity: usize,

    /// Samples required before a weighted average is produced.
    pub min_samples: usize,

    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub smoothing_factor: f64,

    /// Minimum delay between tick starts (ms).
    pub tick_delay_ms: u64,
}

/// Camera capture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Video4Linux device index (`/dev/video{index}`).
    pub device_index: u32,

    /// Requested frame width in pixels.
    pub width: u32,

    /// Requested frame height in pixels.
    pub height: u32,

    /// Requested frame rate.
    pub fps: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazetrack_tracker=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            history_capacity: 20,
            min_samples: 5,
            smoothing_factor: 0.20,
            tick_delay_ms: 10,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 2,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TrackingConfig {
    /// Reject parameter combinations the pipeline cannot run with.
    pub fn validate(&self) -> GazeResult<()> {
        if self.history_capacity == 0 {
            return Err(GazeError::config("history_capacity must be at least 1"));
        }
        if self.min_samples == 0 {
            return Err(GazeError::config("min_samples must be at least 1"));
        }
        if self.min_samples > self.history_capacity {
            return Err(GazeError::config(format!(
                "min_samples ({}) exceeds history_capacity ({})",
                self.min_samples, self.history_capacity
            )));
        }
        if !self.smoothing_factor.is_finite()
            || self.smoothing_factor <= 0.0
            || self.smoothing_factor > 1.0
        {
            return Err(GazeError::config(format!(
                "smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }
        Ok(())
    }
}

impl CameraConfig {
    /// Device node for the configured camera.
    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/video{}", self.device_index))
    }

    /// Bytes in one `bgr24` frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> GazeResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazetrack").join("config.json")
}
