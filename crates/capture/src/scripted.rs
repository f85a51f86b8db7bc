//! Scripted capture source for tests and offline replay.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gazetrack_common::error::{GazeError, GazeResult};
use gazetrack_gaze_model::Frame;

use crate::CaptureSource;

/// Shared view of how many times a source has been released.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a scripted source does once its script runs out.
#[derive(Debug, Clone)]
enum Exhausted {
    Fail,
    Repeat(Frame),
}

/// Capture source that plays back a fixed list of read outcomes.
///
/// `None` entries produce a read failure.
pub struct ScriptedCapture {
    script: VecDeque<Option<Frame>>,
    exhausted: Exhausted,
    reads: u64,
    releases: ReleaseCounter,
}

impl ScriptedCapture {
    /// Play back `script`, then fail every further read.
    pub fn new(script: Vec<Option<Frame>>) -> Self {
        Self {
            script: script.into(),
            exhausted: Exhausted::Fail,
            reads: 0,
            releases: ReleaseCounter::default(),
        }
    }

    /// A source that returns the same blank frame forever.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            script: VecDeque::new(),
            exhausted: Exhausted::Repeat(Frame::blank(width, height, 3)),
            reads: 0,
            releases: ReleaseCounter::default(),
        }
    }

    /// Handle for observing release calls after the source has moved.
    pub fn release_counter(&self) -> ReleaseCounter {
        self.releases.clone()
    }

    /// Number of read attempts so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl CaptureSource for ScriptedCapture {
    fn read(&mut self) -> GazeResult<Frame> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(Some(frame)) => Ok(frame),
            Some(None) => Err(GazeError::capture("scripted read failure")),
            None => match &self.exhausted {
                Exhausted::Repeat(frame) => Ok(frame.clone()),
                Exhausted::Fail => Err(GazeError::capture("script exhausted")),
            },
        }
    }

    fn release(&mut self) -> GazeResult<()> {
        self.releases.increment();
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plays_script_then_fails() {
        let mut source = ScriptedCapture::new(vec![Some(Frame::blank(2, 2, 1)), None]);
        assert!(source.read().is_ok());
        assert!(source.read().is_err());
        assert!(source.read().is_err());
        assert_eq!(source.reads(), 3);
    }

    #[test]
    fn test_blank_repeats_forever() {
        let mut source = ScriptedCapture::blank(4, 3);
        for _ in 0..5 {
            let frame = source.read().unwrap();
            assert_eq!((frame.width(), frame.height(), frame.channels()), (4, 3, 3));
        }
    }

    #[test]
    fn test_release_counter_outlives_source() {
        let mut source = ScriptedCapture::blank(1, 1);
        let counter = source.release_counter();
        source.release().unwrap();
        drop(source);
        assert_eq!(counter.get(), 1);
    }
}
