//! The sensing pipeline context.
//!
//! `SensingPipeline` is the explicit handle a host application threads
//! through its processing loop: it owns the detector and the zone mapper and
//! wires them together, so callers never touch the underlying stores
//! directly. Construction happens once at process start; there are no
//! process-wide singletons or import-time side effects.
//!
//! The pipeline is single-writer by design and holds no locks: the intended
//! execution model is one cooperative loop per logical sensor set that
//! acquires a batch, runs `process_batch` to completion, then acquires the
//! next batch. Hosts that parallelize across acquisition sources run one
//! pipeline instance each.

use std::collections::HashMap;

use crate::baseline::CalibrationReport;
use crate::config::PipelineConfig;
use crate::detector::{DetectorStatistics, MotionDetector, SignalFeatures};
use crate::domain::event::DetectionEvent;
use crate::domain::reading::Reading;
use crate::domain::zone::Zone;
use crate::zones::ZoneMapper;
use crate::Result;

/// Full acquisition-to-attribution pipeline state.
#[derive(Debug)]
pub struct SensingPipeline {
    detector: MotionDetector,
    zones: ZoneMapper,
}

impl SensingPipeline {
    /// Build the pipeline from configuration.
    ///
    /// Fails only on invalid construction parameters; see
    /// [`PipelineConfig::validate`].
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let detector = MotionDetector::new(&config)?;
        let zones = ZoneMapper::from_configs(config.zones);
        Ok(Self { detector, zones })
    }

    /// Process one batch of readings through the full
    /// record -> filter -> score -> attribute sequence.
    ///
    /// Events come back in input order, zone-attributed where the
    /// identifier is assigned to a zone. An empty batch is a no-op.
    pub fn process_batch(&mut self, readings: &[Reading]) -> Vec<DetectionEvent> {
        let mut events = Vec::new();
        for reading in readings {
            if let Some(mut event) = self.detector.score(reading) {
                self.zones.attribute(&mut event);
                self.detector.record_event(event.clone());
                events.push(event);
            }
        }
        events
    }

    /// Bulk calibration from quiet-period samples.
    pub fn calibrate(
        &mut self,
        samples: &HashMap<String, Vec<i32>>,
        duration_secs: u64,
    ) -> CalibrationReport {
        self.detector.calibrate(samples, duration_secs)
    }

    /// Operator override of a baseline.
    pub fn update_baseline(&mut self, identifier: &str, new_baseline: f64) {
        self.detector.update_baseline(identifier, new_baseline);
    }

    /// Adjust detector sensitivity (clamped to its valid range).
    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.detector.set_sensitivity(sensitivity);
    }

    /// Statistical features for one identifier's history window.
    pub fn extract_features(&self, identifier: &str) -> Option<SignalFeatures> {
        self.detector.extract_features(identifier)
    }

    /// Counter and tuning snapshot.
    pub fn get_statistics(&self) -> DetectorStatistics {
        self.detector.get_statistics()
    }

    /// The most recent events, oldest first, truncated to `limit`.
    pub fn get_recent_events(&self, limit: usize) -> Vec<DetectionEvent> {
        self.detector.get_recent_events(limit)
    }

    /// Snapshot of all configured zones.
    pub fn get_all_zones(&self) -> Vec<Zone> {
        self.zones.get_all_zones()
    }

    /// Snapshot of one zone by id.
    pub fn get_zone_by_id(&self, zone_id: &str) -> Option<Zone> {
        self.zones.get_zone_by_id(zone_id)
    }

    /// Snapshot of zones currently marked active.
    pub fn get_active_zones(&self) -> Vec<Zone> {
        self.zones.get_active_zones()
    }

    /// Clear the sticky active flag on every zone.
    pub fn reset_zone_states(&mut self) {
        self.zones.reset_zone_states();
    }

    /// Score-based zone attribution for a simultaneous snapshot of
    /// readings; see [`ZoneMapper::locate_by_scores`].
    pub fn locate_by_scores(
        &self,
        readings: &HashMap<String, i32>,
        device_zones: &HashMap<String, String>,
    ) -> Option<String> {
        self.zones.locate_by_scores(readings, device_zones)
    }

    /// Mutable access to the zone mapper for zone management.
    pub fn zones_mut(&mut self) -> &mut ZoneMapper {
        &mut self.zones
    }

    /// Direct access to the detector for tuning and inspection.
    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    /// Clear detector state (baselines, history, events, counters).
    ///
    /// Zone definitions survive; their runtime activity is cleared.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.zones.reset_zone_states();
    }
}
