//! Per-identifier bounded history of raw RSSI readings.
//!
//! Each tracked identifier owns a fixed-capacity ring of its most recent raw
//! samples. The ring feeds both the smoothing filter and feature extraction;
//! it is never consulted for baselines once one is installed.

use std::collections::{BTreeMap, VecDeque};

/// Default ring capacity (samples per identifier).
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Owned store of per-identifier RSSI history rings.
///
/// Rings are created lazily on first sight of an identifier. Length never
/// exceeds the configured capacity; the oldest sample is evicted first.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    rings: BTreeMap<String, VecDeque<i32>>,
    capacity: usize,
}

impl HistoryStore {
    /// Create a store whose rings hold at most `capacity` samples.
    ///
    /// A zero capacity is bumped to 1 so that a ring can always hold the
    /// most recent sample.
    pub fn new(capacity: usize) -> Self {
        Self {
            rings: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample to the identifier's ring, creating it on first sight.
    pub fn record(&mut self, identifier: &str, rssi_dbm: i32) {
        let ring = self
            .rings
            .entry(identifier.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        if ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(rssi_dbm);
    }

    /// The current ring contents for an identifier, oldest first.
    pub fn samples(&self, identifier: &str) -> Option<&VecDeque<i32>> {
        self.rings.get(identifier)
    }

    /// Ring contents as `f64`, oldest first. Empty vec for unknown identifiers.
    pub fn samples_f64(&self, identifier: &str) -> Vec<f64> {
        self.rings
            .get(identifier)
            .map(|ring| ring.iter().map(|&v| v as f64).collect())
            .unwrap_or_default()
    }

    /// Number of samples currently held for an identifier.
    pub fn len(&self, identifier: &str) -> usize {
        self.rings.get(identifier).map_or(0, VecDeque::len)
    }

    /// Whether any identifier is being tracked.
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Number of identifiers with at least one sample.
    pub fn tracked_identifiers(&self) -> usize {
        self.rings.len()
    }

    /// Configured per-ring capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all rings.
    pub fn clear(&mut self) {
        self.rings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_created_on_first_sight() {
        let mut store = HistoryStore::new(8);
        assert_eq!(store.len("net"), 0);

        store.record("net", -60);
        assert_eq!(store.len("net"), 1);
        assert_eq!(store.tracked_identifiers(), 1);
    }

    #[test]
    fn ring_never_exceeds_capacity() {
        let mut store = HistoryStore::new(5);
        for i in 0..9 {
            store.record("net", -60 - i);
        }

        let ring = store.samples("net").unwrap();
        assert_eq!(ring.len(), 5);
        // Oldest 4 evicted; newest 5 remain in insertion order.
        let values: Vec<i32> = ring.iter().copied().collect();
        assert_eq!(values, vec![-64, -65, -66, -67, -68]);
    }

    #[test]
    fn zero_capacity_bumped_to_one() {
        let mut store = HistoryStore::new(0);
        store.record("net", -60);
        store.record("net", -61);
        assert_eq!(store.len("net"), 1);
        assert_eq!(store.samples("net").unwrap()[0], -61);
    }

    #[test]
    fn clear_drops_all_rings() {
        let mut store = HistoryStore::new(5);
        store.record("a", -60);
        store.record("b", -70);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len("a"), 0);
    }

    #[test]
    fn samples_f64_conversion() {
        let mut store = HistoryStore::new(5);
        store.record("net", -60);
        store.record("net", -62);
        assert_eq!(store.samples_f64("net"), vec![-60.0, -62.0]);
        assert!(store.samples_f64("other").is_empty());
    }
}
