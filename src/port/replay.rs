//! Deterministic replay adapter for the scan port.

use std::collections::VecDeque;

use crate::domain::reading::Reading;
use crate::port::scan_port::ScanSource;
use crate::Result;

/// A [`ScanSource`] that replays pre-recorded batches in order.
///
/// Used in tests and for offline replay of captured scan sessions. Once the
/// queue is exhausted every further scan yields an empty batch, matching a
/// live source that currently sees nothing.
#[derive(Debug, Default)]
pub struct ReplaySource {
    batches: VecDeque<Vec<Reading>>,
}

impl ReplaySource {
    /// Create a source replaying the given batches front to back.
    pub fn new(batches: impl IntoIterator<Item = Vec<Reading>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }

    /// Append another batch to the end of the queue.
    pub fn push_batch(&mut self, batch: Vec<Reading>) {
        self.batches.push_back(batch);
    }

    /// Number of batches still queued.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl ScanSource for ReplaySource {
    fn scan(&mut self) -> Result<Vec<Reading>> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}
