//! Published direction shared between the tracking loop and readers.

use std::sync::{PoisonError, RwLock};

use gazetrack_gaze_model::Direction;
use serde::Serialize;

/// A direction together with the number of writes that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DirectionSnapshot {
    #[serde(flatten)]
    pub direction: Direction,
    /// 0 before the first write, then 1, 2, ..
    pub sequence: u64,
}

/// Single-writer, many-reader holder of the published direction.
///
/// The pair is replaced as one record under a lock, so a reader sees either
/// the whole previous pair or the whole new one. A reader waits at most for
/// one in-progress write, which is two field stores and a counter bump. Only
/// the tracking loop in this crate can write.
#[derive(Debug, Default)]
pub struct DirectionStore {
    snapshot: RwLock<DirectionSnapshot>,
}

impl DirectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published direction; `(0, 0)` before the first write.
    pub fn read(&self) -> Direction {
        self.snapshot().direction
    }

    /// Latest published direction with its write sequence number.
    pub fn snapshot(&self) -> DirectionSnapshot {
        // The guarded value is Copy and always whole, so a poisoned lock
        // still holds a consistent pair.
        *self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the published direction. Returns the new sequence number.
    pub(crate) fn write(&self, direction: Direction) -> u64 {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.direction = direction;
        guard.sequence += 1;
        guard.sequence
    }
}
