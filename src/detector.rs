//! Anomaly scorer: turns per-identifier readings into motion events.
//!
//! Each identifier is in one of two logical states, uncalibrated or
//! calibrated, and the transition is one-way: once a baseline exists
//! (explicit calibration, automatic bootstrap, or operator override) ordinary
//! reading processing never changes it. Readings for uncalibrated
//! identifiers only accumulate history; they yield no decisions and no
//! errors.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::baseline::{BaselineStore, CalibrationReport, MIN_CALIBRATION_SAMPLES};
use crate::config::PipelineConfig;
use crate::domain::event::DetectionEvent;
use crate::domain::history::HistoryStore;
use crate::domain::reading::Reading;
use crate::filter::ButterworthFilter;
use crate::stats;
use crate::Result;

/// Maximum number of events retained in the in-memory event log.
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Minimum history length for feature extraction.
pub const MIN_FEATURE_SAMPLES: usize = 5;

/// Valid sensitivity range; values outside are clamped, never rejected.
pub const SENSITIVITY_RANGE: (f64, f64) = (0.5, 2.0);

/// Statistical features over one identifier's history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFeatures {
    /// Mean RSSI over the window, dBm.
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Population variance.
    pub variance: f64,
    /// Weakest sample in the window.
    pub min: f64,
    /// Strongest sample in the window.
    pub max: f64,
    /// `max - min`.
    pub range: f64,
    /// Median sample.
    pub median: f64,
    /// Baseline for the identifier, when one is set.
    pub baseline: Option<f64>,
    /// `|mean - baseline|`, when a baseline is set.
    pub deviation_from_baseline: Option<f64>,
}

/// Snapshot of detector counters and tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorStatistics {
    /// Whether a bulk calibration pass has completed.
    pub is_calibrated: bool,
    /// Total motion events emitted since construction or last reset.
    pub total_detections: u64,
    /// Identifiers with a baseline.
    pub networks_tracked: usize,
    /// Current effective threshold in dBm.
    pub threshold: f64,
    /// Current sensitivity multiplier.
    pub sensitivity: f64,
    /// Events currently held in the log.
    pub recent_events_count: usize,
}

/// RSSI anomaly scorer with baseline management and a bounded event log.
#[derive(Debug)]
pub struct MotionDetector {
    /// Effective threshold: `base_threshold * sensitivity` at construction,
    /// rescaled in place on every sensitivity change.
    threshold: f64,
    sensitivity: f64,
    filter: ButterworthFilter,
    filter_order: usize,
    baselines: BaselineStore,
    history: HistoryStore,
    events: VecDeque<DetectionEvent>,
    total_detections: u64,
}

impl MotionDetector {
    /// Build a detector from validated configuration.
    ///
    /// The sensitivity is clamped into [`SENSITIVITY_RANGE`]; other invalid
    /// parameters are rejected.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let sensitivity = config
            .sensitivity
            .clamp(SENSITIVITY_RANGE.0, SENSITIVITY_RANGE.1);
        let threshold = config.threshold * sensitivity;
        let filter = ButterworthFilter::new(config.filter_order, config.filter_cutoff)?;

        tracing::info!(
            threshold,
            sensitivity,
            filter_order = config.filter_order,
            history_size = config.history_size,
            "motion detector initialized"
        );

        Ok(Self {
            threshold,
            sensitivity,
            filter,
            filter_order: config.filter_order,
            baselines: BaselineStore::new(),
            history: HistoryStore::new(config.history_size),
            events: VecDeque::with_capacity(EVENT_LOG_CAPACITY),
            total_detections: 0,
        })
    }

    /// Bulk calibration from quiet-period samples.
    ///
    /// Delegates to [`BaselineStore::calibrate`]; the history rings are not
    /// touched.
    pub fn calibrate(
        &mut self,
        samples: &HashMap<String, Vec<i32>>,
        duration_secs: u64,
    ) -> CalibrationReport {
        self.baselines.calibrate(samples, duration_secs)
    }

    /// Score one reading.
    ///
    /// Records the reading in the history ring, bootstraps a baseline when
    /// the identifier has accumulated enough ambient samples without one,
    /// then runs the filtered deviation test. Returns the event on a
    /// positive decision; the caller is responsible for logging it via
    /// [`record_event`], which allows zone attribution to happen in between.
    ///
    /// [`record_event`]: MotionDetector::record_event
    pub fn score(&mut self, reading: &Reading) -> Option<DetectionEvent> {
        self.history.record(&reading.identifier, reading.rssi_dbm);

        let baseline = match self.baselines.get(&reading.identifier) {
            Some(b) => b,
            None => {
                if self.history.len(&reading.identifier) >= MIN_CALIBRATION_SAMPLES {
                    let samples = self.history.samples_f64(&reading.identifier);
                    self.baselines.auto_calibrate(&reading.identifier, &samples);
                }
                // Not yet calibrated: no decision this cycle.
                return None;
            }
        };

        let filtered = self.filtered_value(reading);
        let deviation = (filtered - baseline).abs();

        if deviation <= self.threshold {
            return None;
        }

        let confidence = (deviation / self.threshold * 100.0).min(100.0);
        let event = DetectionEvent {
            timestamp: reading.timestamp,
            identifier: reading.identifier.clone(),
            rssi_current: reading.rssi_dbm,
            baseline,
            deviation,
            zone: None,
            confidence,
        };

        self.total_detections += 1;
        tracing::info!(
            identifier = %reading.identifier,
            rssi = reading.rssi_dbm,
            baseline,
            deviation,
            confidence,
            "motion detected"
        );

        Some(event)
    }

    /// Smoothed estimate of the most recent sample, falling back to the raw
    /// reading when the window is too short or the filter degenerates.
    fn filtered_value(&self, reading: &Reading) -> f64 {
        let raw = reading.rssi_dbm as f64;
        if self.history.len(&reading.identifier) < 2 * self.filter_order {
            return raw;
        }

        let window = self.history.samples_f64(&reading.identifier);
        match self.filter.smoothed_last(&window) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(
                    identifier = %reading.identifier,
                    error = %err,
                    "filter fallback to raw reading"
                );
                raw
            }
        }
    }

    /// Append an event to the bounded log.
    pub fn record_event(&mut self, event: DetectionEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Score and log a whole batch, returning the events in input order.
    pub fn process_batch(&mut self, readings: &[Reading]) -> Vec<DetectionEvent> {
        let mut events = Vec::new();
        for reading in readings {
            if let Some(event) = self.score(reading) {
                self.record_event(event.clone());
                events.push(event);
            }
        }
        events
    }

    /// Statistical features over the identifier's history window.
    ///
    /// Returns `None` below [`MIN_FEATURE_SAMPLES`]; that floor is a data
    /// insufficiency, not an error.
    pub fn extract_features(&self, identifier: &str) -> Option<SignalFeatures> {
        let window = self.history.samples_f64(identifier);
        if window.len() < MIN_FEATURE_SAMPLES {
            return None;
        }

        let mean = stats::mean(&window);
        let min = stats::min(&window);
        let max = stats::max(&window);
        let baseline = self.baselines.get(identifier);

        Some(SignalFeatures {
            mean,
            std: stats::std_deviation(&window),
            variance: stats::variance(&window),
            min,
            max,
            range: max - min,
            median: stats::median(&window),
            baseline,
            deviation_from_baseline: baseline.map(|b| (mean - b).abs()),
        })
    }

    /// Adjust sensitivity, clamped into [`SENSITIVITY_RANGE`].
    ///
    /// The current effective threshold is rescaled by the ratio of new to
    /// old sensitivity, so repeated adjustments compose against the last
    /// threshold rather than recomputing from the configured base.
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        let clamped = if sensitivity.is_finite() {
            sensitivity.clamp(SENSITIVITY_RANGE.0, SENSITIVITY_RANGE.1)
        } else {
            SENSITIVITY_RANGE.0
        };

        let old_threshold = self.threshold;
        self.threshold = self.threshold / self.sensitivity * clamped;
        self.sensitivity = clamped;

        tracing::info!(
            sensitivity = clamped,
            old_threshold,
            new_threshold = self.threshold,
            "sensitivity adjusted"
        );
    }

    /// Operator override of a baseline, bypassing sample-count checks.
    pub fn update_baseline(&mut self, identifier: &str, new_baseline: f64) {
        self.baselines.update(identifier, new_baseline);
    }

    /// Remove a baseline, re-arming auto-calibration for the identifier.
    pub fn clear_baseline(&mut self, identifier: &str) -> Option<f64> {
        self.baselines.clear(identifier)
    }

    /// The baseline for an identifier, if set.
    pub fn baseline(&self, identifier: &str) -> Option<f64> {
        self.baselines.get(identifier)
    }

    /// The most recent events, oldest first, truncated to `limit`.
    pub fn get_recent_events(&self, limit: usize) -> Vec<DetectionEvent> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// Counter and tuning snapshot.
    pub fn get_statistics(&self) -> DetectorStatistics {
        DetectorStatistics {
            is_calibrated: self.baselines.is_calibrated(),
            total_detections: self.total_detections,
            networks_tracked: self.baselines.len(),
            threshold: self.threshold,
            sensitivity: self.sensitivity,
            recent_events_count: self.events.len(),
        }
    }

    /// Current effective threshold in dBm.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Current sensitivity multiplier.
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Whether a bulk calibration pass has completed.
    pub fn is_calibrated(&self) -> bool {
        self.baselines.is_calibrated()
    }

    /// Clear baselines, history, events, and counters to the initial state.
    pub fn reset(&mut self) {
        self.baselines.reset();
        self.history.clear();
        self.events.clear();
        self.total_detections = 0;
        tracing::info!("detector reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> MotionDetector {
        MotionDetector::new(&PipelineConfig::default()).unwrap()
    }

    fn calibrated_detector(identifier: &str, rssi: i32) -> MotionDetector {
        let mut det = detector();
        let mut samples = HashMap::new();
        samples.insert(identifier.to_string(), vec![rssi; 30]);
        det.calibrate(&samples, 30);
        det
    }

    #[test]
    fn uncalibrated_identifier_yields_no_decision() {
        let mut det = detector();
        assert!(det.score(&Reading::now("net", -60)).is_none());
        assert!(!det.is_calibrated());
    }

    #[test]
    fn detection_scenario_matches_reference() {
        // Baseline -60 dBm, threshold 10 * sensitivity 1.0.
        let mut det = calibrated_detector("Network1", -60);
        assert!((det.baseline("Network1").unwrap() - (-60.0)).abs() < 1e-9);

        let event = det.score(&Reading::now("Network1", -45)).unwrap();
        assert_eq!(event.rssi_current, -45);
        assert!((event.deviation - 15.0).abs() < 1e-9);
        assert!((event.confidence - 100.0).abs() < 1e-9);
        assert!((event.baseline - (-60.0)).abs() < 1e-9);

        assert!(det.score(&Reading::now("Network1", -61)).is_none());
    }

    #[test]
    fn deviation_equal_to_threshold_is_not_motion() {
        let mut det = calibrated_detector("Network1", -60);
        // |(-70) - (-60)| == 10.0 == threshold: strictly-greater rule.
        assert!(det.score(&Reading::now("Network1", -70)).is_none());
    }

    #[test]
    fn auto_calibration_bootstraps_after_ten_samples() {
        let mut det = detector();
        for _ in 0..9 {
            assert!(det.score(&Reading::now("Ambient", -60)).is_none());
            assert!(det.baseline("Ambient").is_none());
        }

        // Tenth sample installs the baseline but still yields no decision.
        assert!(det.score(&Reading::now("Ambient", -60)).is_none());
        assert!((det.baseline("Ambient").unwrap() - (-60.0)).abs() < 1e-9);

        // Now a large swing triggers.
        let event = det.score(&Reading::now("Ambient", -40)).unwrap();
        assert!(event.deviation > 10.0);
    }

    #[test]
    fn auto_calibration_fires_once() {
        let mut det = detector();
        for _ in 0..10 {
            det.score(&Reading::now("net", -60));
        }
        let installed = det.baseline("net").unwrap();

        // Drifting readings must not silently rewrite the baseline.
        for _ in 0..30 {
            det.score(&Reading::now("net", -45));
        }
        assert!((det.baseline("net").unwrap() - installed).abs() < 1e-9);
    }

    #[test]
    fn cleared_baseline_rearms_auto_calibration() {
        let mut det = detector();
        for _ in 0..10 {
            det.score(&Reading::now("net", -60));
        }
        assert!(det.baseline("net").is_some());

        det.clear_baseline("net");
        assert!(det.baseline("net").is_none());

        // History already holds >= 10 samples, so the next reading re-arms.
        det.score(&Reading::now("net", -60));
        assert!(det.baseline("net").is_some());
    }

    #[test]
    fn filtered_window_absorbs_single_spike_context() {
        let mut det = calibrated_detector("net", -60);
        // Build a long quiet window so the zero-phase filter engages.
        for _ in 0..40 {
            assert!(det.score(&Reading::now("net", -60)).is_none());
        }

        // A sustained shift is still detected through the filter.
        let event = det.score(&Reading::now("net", -45)).unwrap();
        assert_eq!(event.rssi_current, -45);
        assert!((event.deviation - 15.0).abs() < 0.5);
    }

    #[test]
    fn batch_preserves_input_order_and_logs() {
        let mut det = detector();
        let mut samples = HashMap::new();
        samples.insert("Network1".to_string(), vec![-60; 30]);
        samples.insert("Network2".to_string(), vec![-70; 30]);
        det.calibrate(&samples, 30);

        let batch = vec![
            Reading::now("Network1", -45), // motion
            Reading::now("Network2", -69), // quiet
        ];
        let events = det.process_batch(&batch);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].identifier, "Network1");
        assert_eq!(det.get_statistics().total_detections, 1);
        assert_eq!(det.get_recent_events(10).len(), 1);
    }

    #[test]
    fn event_log_is_bounded() {
        let mut det = calibrated_detector("net", -60);
        let template = det.score(&Reading::now("net", -40)).unwrap();

        for i in 0..(EVENT_LOG_CAPACITY + 20) {
            let mut event = template.clone();
            event.rssi_current = -(i as i32 % 90) - 30;
            det.record_event(event);
        }

        let stats = det.get_statistics();
        assert_eq!(stats.recent_events_count, EVENT_LOG_CAPACITY);

        // Oldest entries were discarded; the newest survive in order.
        let recent = det.get_recent_events(EVENT_LOG_CAPACITY);
        assert_eq!(recent.len(), EVENT_LOG_CAPACITY);
        assert_eq!(
            recent.last().unwrap().rssi_current,
            -(((EVENT_LOG_CAPACITY + 19) as i32) % 90) - 30
        );
    }

    #[test]
    fn recent_events_most_recent_last() {
        let mut det = calibrated_detector("net", -60);
        let e1 = det.score(&Reading::now("net", -40)).unwrap();
        det.record_event(e1);
        let e2 = det.score(&Reading::now("net", -45)).unwrap();
        det.record_event(e2.clone());

        let recent = det.get_recent_events(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], e2);
    }

    #[test]
    fn sensitivity_clamps_and_rescales_threshold() {
        let mut det = detector();
        assert!((det.threshold() - 10.0).abs() < 1e-9);

        det.set_sensitivity(5.0);
        assert!((det.sensitivity() - 2.0).abs() < 1e-9);
        assert!((det.threshold() - 20.0).abs() < 1e-9);

        det.set_sensitivity(-1.0);
        assert!((det.sensitivity() - 0.5).abs() < 1e-9);
        assert!((det.threshold() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn construction_clamps_initial_sensitivity() {
        let config = PipelineConfig::builder().sensitivity(9.0).build();
        let det = MotionDetector::new(&config).unwrap();
        assert!((det.sensitivity() - 2.0).abs() < 1e-9);
        assert!((det.threshold() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn features_below_floor_are_none() {
        let mut det = detector();
        for _ in 0..4 {
            det.score(&Reading::now("net", -60));
        }
        assert!(det.extract_features("net").is_none());
        assert!(det.extract_features("unknown").is_none());
    }

    #[test]
    fn features_reflect_window_and_baseline() {
        let mut det = detector();
        for rssi in [-60, -61, -60, -59, -60] {
            det.score(&Reading::now("net", rssi));
        }

        let features = det.extract_features("net").unwrap();
        assert!((features.mean - (-60.0)).abs() < 1e-9);
        assert_eq!(features.min, -61.0);
        assert_eq!(features.max, -59.0);
        assert_eq!(features.range, 2.0);
        assert_eq!(features.median, -60.0);
        assert!(features.baseline.is_none());

        det.update_baseline("net", -65.0);
        let features = det.extract_features("net").unwrap();
        assert_eq!(features.baseline, Some(-65.0));
        assert!((features.deviation_from_baseline.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut det = calibrated_detector("net", -60);
        let event = det.score(&Reading::now("net", -40)).unwrap();
        det.record_event(event);

        det.reset();

        let stats = det.get_statistics();
        assert!(!stats.is_calibrated);
        assert_eq!(stats.total_detections, 0);
        assert_eq!(stats.networks_tracked, 0);
        assert_eq!(stats.recent_events_count, 0);
        assert!(det.baseline("net").is_none());
        assert!(det.extract_features("net").is_none());
    }

    #[test]
    fn out_of_range_reading_is_clamped_not_fatal() {
        let mut det = calibrated_detector("net", -60);
        // Constructor clamps -999 to the floor; the pipeline keeps going.
        let event = det.score(&Reading::now("net", -999)).unwrap();
        assert_eq!(event.rssi_current, -120);
    }
}
