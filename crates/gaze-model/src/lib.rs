//! GazeTrack Gaze Model
//!
//! Defines the data contracts shared by the tracking pipeline:
//! - **Direction:** normalized `(dx, dy)` offset of the target from frame center
//! - **Raw samples:** one optional detector result per tick, plus a JSONL
//!   format for recording and replaying them
//! - **Frames:** packed pixel buffers handed from capture to detection
//!
//! Offsets are normalized by half the frame width/height, so `(0, 0)` is
//! the frame center and `(±1, ±1)` are the edges.

pub mod direction;
pub mod frame;
pub mod sample;

pub use direction::*;
pub use frame::*;
pub use sample::*;
