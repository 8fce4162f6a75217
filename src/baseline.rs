//! Baseline store and calibration.
//!
//! A baseline is the expected signal strength for an access point during a
//! motion-free period, held as a plain scalar per identifier. Baselines are
//! set by bulk calibration, by automatic bootstrap once enough ambient
//! samples accrue, or by explicit operator override. Ordinary reading
//! processing never mutates them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::stats;

/// Minimum sample count for a baseline to be computed, whether by bulk
/// calibration or automatic bootstrap.
pub const MIN_CALIBRATION_SAMPLES: usize = 10;

/// Outcome of a bulk calibration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationReport {
    /// Identifiers that received a baseline in this pass.
    pub networks_calibrated: usize,
    /// Total samples consumed across all identifiers, including skipped ones.
    pub samples_collected: usize,
    /// Duration of the quiet-period sampling, in seconds.
    pub duration_secs: u64,
}

/// Per-identifier reference signal levels.
#[derive(Debug, Clone, Default)]
pub struct BaselineStore {
    baselines: BTreeMap<String, f64>,
    is_calibrated: bool,
}

impl BaselineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk calibration from quiet-period samples.
    ///
    /// Every identifier with at least [`MIN_CALIBRATION_SAMPLES`] samples
    /// gets `baseline = mean(samples)`; identifiers below the floor are
    /// logged and skipped, never failed. Re-calibrating overwrites baselines
    /// for the identifiers supplied; absent identifiers keep theirs.
    ///
    /// The history rings are deliberately untouched: callers that want
    /// continuous history feed the same samples through `record` themselves.
    pub fn calibrate(
        &mut self,
        samples: &HashMap<String, Vec<i32>>,
        duration_secs: u64,
    ) -> CalibrationReport {
        tracing::info!(
            networks = samples.len(),
            duration_secs,
            "starting baseline calibration"
        );

        let mut calibrated = 0;
        let mut collected = 0;

        for (identifier, values) in samples {
            collected += values.len();

            if values.len() < MIN_CALIBRATION_SAMPLES {
                tracing::warn!(
                    identifier = %identifier,
                    samples = values.len(),
                    required = MIN_CALIBRATION_SAMPLES,
                    "too few samples, skipping identifier"
                );
                continue;
            }

            let as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
            let baseline = stats::mean(&as_f64);
            self.baselines.insert(identifier.clone(), baseline);
            calibrated += 1;

            tracing::info!(
                identifier = %identifier,
                baseline,
                std = stats::std_deviation(&as_f64),
                "baseline calibrated"
            );
        }

        self.is_calibrated = true;

        CalibrationReport {
            networks_calibrated: calibrated,
            samples_collected: collected,
            duration_secs,
        }
    }

    /// Install a baseline computed from ambient history (automatic bootstrap).
    pub fn auto_calibrate(&mut self, identifier: &str, samples: &[f64]) {
        let baseline = stats::mean(samples);
        self.baselines.insert(identifier.to_string(), baseline);
        tracing::info!(identifier = %identifier, baseline, "auto-calibrated baseline");
    }

    /// Operator override: replace a baseline unconditionally, bypassing
    /// sample-count checks.
    pub fn update(&mut self, identifier: &str, new_baseline: f64) {
        let old = self.baselines.insert(identifier.to_string(), new_baseline);
        tracing::info!(
            identifier = %identifier,
            old_baseline = ?old,
            new_baseline,
            "baseline overridden"
        );
    }

    /// Remove a baseline, re-arming auto-calibration for the identifier.
    pub fn clear(&mut self, identifier: &str) -> Option<f64> {
        self.baselines.remove(identifier)
    }

    /// The baseline for an identifier, if one is set.
    pub fn get(&self, identifier: &str) -> Option<f64> {
        self.baselines.get(identifier).copied()
    }

    /// Whether the identifier has a baseline.
    pub fn contains(&self, identifier: &str) -> bool {
        self.baselines.contains_key(identifier)
    }

    /// Number of identifiers with a baseline.
    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    /// Whether no baselines are set.
    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// Whether a bulk calibration pass has completed.
    pub fn is_calibrated(&self) -> bool {
        self.is_calibrated
    }

    /// Reset to the initial empty state.
    pub fn reset(&mut self) {
        self.baselines.clear();
        self.is_calibrated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples_of(identifier: &str, values: Vec<i32>) -> HashMap<String, Vec<i32>> {
        let mut map = HashMap::new();
        map.insert(identifier.to_string(), values);
        map
    }

    #[test]
    fn calibrate_computes_mean_baseline() {
        let mut store = BaselineStore::new();
        let report = store.calibrate(&samples_of("Network1", vec![-60; 30]), 30);

        assert_eq!(report.networks_calibrated, 1);
        assert_eq!(report.samples_collected, 30);
        assert_eq!(report.duration_secs, 30);
        assert!(store.is_calibrated());
        assert!((store.get("Network1").unwrap() - (-60.0)).abs() < 1e-9);
    }

    #[test]
    fn calibrate_skips_identifiers_below_floor() {
        let mut store = BaselineStore::new();
        let mut samples = samples_of("Sparse", vec![-60; 5]);
        samples.insert("Dense".to_string(), vec![-70; 12]);

        let report = store.calibrate(&samples, 10);

        assert_eq!(report.networks_calibrated, 1);
        assert_eq!(report.samples_collected, 17);
        assert!(store.contains("Dense"));
        assert!(!store.contains("Sparse"));
    }

    #[test]
    fn recalibration_keeps_absent_identifiers() {
        let mut store = BaselineStore::new();
        store.calibrate(&samples_of("A", vec![-60; 10]), 10);
        store.calibrate(&samples_of("B", vec![-70; 10]), 10);

        assert!((store.get("A").unwrap() - (-60.0)).abs() < 1e-9);
        assert!((store.get("B").unwrap() - (-70.0)).abs() < 1e-9);
    }

    #[test]
    fn recalibration_overwrites_supplied_identifiers() {
        let mut store = BaselineStore::new();
        store.calibrate(&samples_of("A", vec![-60; 10]), 10);
        store.calibrate(&samples_of("A", vec![-64; 10]), 10);

        assert!((store.get("A").unwrap() - (-64.0)).abs() < 1e-9);
    }

    #[test]
    fn update_bypasses_sample_checks() {
        let mut store = BaselineStore::new();
        store.update("Manual", -55.5);
        assert!((store.get("Manual").unwrap() - (-55.5)).abs() < 1e-9);
        // An override alone does not mark the store bulk-calibrated.
        assert!(!store.is_calibrated());
    }

    #[test]
    fn clear_removes_single_baseline() {
        let mut store = BaselineStore::new();
        store.update("A", -60.0);
        assert_eq!(store.clear("A"), Some(-60.0));
        assert!(!store.contains("A"));
        assert_eq!(store.clear("A"), None);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut store = BaselineStore::new();
        store.calibrate(&samples_of("A", vec![-60; 10]), 10);
        store.reset();

        assert!(store.is_empty());
        assert!(!store.is_calibrated());
    }
}
