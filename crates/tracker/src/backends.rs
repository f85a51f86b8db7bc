//! Detector implementations that replay recorded output.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gazetrack_common::error::GazeResult;
use gazetrack_gaze_model::{Direction, Frame, RawSample};

use crate::Detector;

/// Replays a fixed sequence of raw samples, one per call, ignoring frames.
///
/// Once the sequence is used up every call reports no target. The exhaustion
/// flag is raised by the first call that finds the script empty, so by then
/// the tick that consumed the last sample has finished.
pub struct ScriptedDetector {
    samples: VecDeque<RawSample>,
    exhausted: Arc<AtomicBool>,
}

impl ScriptedDetector {
    pub fn new(samples: Vec<RawSample>) -> Self {
        Self {
            samples: samples.into(),
            exhausted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A detector that never finds a target.
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Flag raised once a call arrives after every scripted sample was handed out.
    pub fn exhausted_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exhausted)
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _frame: &Frame) -> GazeResult<Option<Direction>> {
        match self.samples.pop_front() {
            Some(sample) => Ok(sample),
            None => {
                self.exhausted.store(true, Ordering::Release);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
