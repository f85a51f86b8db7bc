//! GazeTrack Smoothing
//!
//! Two-stage filtering of noisy detector output:
//! - **Sample history:** a bounded FIFO of recent detections, reduced to an
//!   exponentially recency-weighted average
//! - **Direction smoother:** exponential interpolation of the published
//!   direction toward the latest weighted average
//!
//! This crate is pure computation with no I/O or threads.

pub mod history;
pub mod smoother;

pub use history::SampleHistory;
pub use smoother::DirectionSmoother;
