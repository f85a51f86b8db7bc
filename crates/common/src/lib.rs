//! GazeTrack Common Utilities
//!
//! Shared infrastructure for all GazeTrack crates:
//! - Error types and result aliases
//! - Tick pacing for the tracking loop cadence
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
