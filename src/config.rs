//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::domain::history::DEFAULT_HISTORY_CAPACITY;
use crate::domain::zone::ZoneConfig;
use crate::error::MotionError;

/// Configuration for the sensing pipeline.
///
/// Supplied by the configuration collaborator at startup; validated when the
/// pipeline is constructed. Sensitivity is clamped rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base deviation threshold in dBm. The effective threshold is
    /// `threshold * sensitivity`.
    pub threshold: f64,

    /// Sensitivity multiplier, clamped to [0.5, 2.0].
    pub sensitivity: f64,

    /// Butterworth filter order.
    pub filter_order: usize,

    /// Normalized filter cutoff frequency, in (0, 1).
    pub filter_cutoff: f64,

    /// Per-identifier history ring capacity.
    pub history_size: usize,

    /// Static zone definitions.
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            sensitivity: 1.0,
            filter_order: 3,
            filter_cutoff: 0.1,
            history_size: DEFAULT_HISTORY_CAPACITY,
            zones: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validate construction-time parameters.
    ///
    /// Sensitivity is not checked here: out-of-range values clamp silently
    /// when the detector is built.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(MotionError::InvalidConfig(format!(
                "threshold must be a positive finite dBm value, got {}",
                self.threshold
            )));
        }
        if self.filter_order == 0 {
            return Err(MotionError::InvalidConfig(
                "filter_order must be at least 1".to_string(),
            ));
        }
        if !(self.filter_cutoff > 0.0 && self.filter_cutoff < 1.0) {
            return Err(MotionError::InvalidConfig(format!(
                "filter_cutoff must lie in (0, 1), got {}",
                self.filter_cutoff
            )));
        }
        if self.history_size == 0 {
            return Err(MotionError::InvalidConfig(
                "history_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a builder seeded with defaults.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the base deviation threshold in dBm.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the sensitivity multiplier.
    pub fn sensitivity(mut self, sensitivity: f64) -> Self {
        self.config.sensitivity = sensitivity;
        self
    }

    /// Set the Butterworth filter order.
    pub fn filter_order(mut self, order: usize) -> Self {
        self.config.filter_order = order;
        self
    }

    /// Set the normalized filter cutoff frequency.
    pub fn filter_cutoff(mut self, cutoff: f64) -> Self {
        self.config.filter_cutoff = cutoff;
        self
    }

    /// Set the per-identifier history capacity.
    pub fn history_size(mut self, size: usize) -> Self {
        self.config.history_size = size;
        self
    }

    /// Add a static zone definition.
    pub fn zone(mut self, zone: ZoneConfig) -> Self {
        self.config.zones.push(zone);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.threshold, 10.0);
        assert_eq!(config.sensitivity, 1.0);
        assert_eq!(config.filter_order, 3);
        assert_eq!(config.filter_cutoff, 0.1);
        assert_eq!(config.history_size, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = PipelineConfig::builder()
            .threshold(8.0)
            .sensitivity(1.5)
            .filter_order(2)
            .filter_cutoff(0.2)
            .history_size(30)
            .build();

        assert_eq!(config.threshold, 8.0);
        assert_eq!(config.sensitivity, 1.5);
        assert_eq!(config.filter_order, 2);
        assert_eq!(config.filter_cutoff, 0.2);
        assert_eq!(config.history_size, 30);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(PipelineConfig::builder().threshold(0.0).build().validate().is_err());
        assert!(PipelineConfig::builder().threshold(f64::NAN).build().validate().is_err());
        assert!(PipelineConfig::builder().filter_order(0).build().validate().is_err());
        assert!(PipelineConfig::builder().filter_cutoff(0.0).build().validate().is_err());
        assert!(PipelineConfig::builder().filter_cutoff(1.0).build().validate().is_err());
        assert!(PipelineConfig::builder().history_size(0).build().validate().is_err());
    }

    #[test]
    fn config_json_round_trip() {
        let config = PipelineConfig::builder().threshold(12.5).build();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.threshold, 12.5);
        assert_eq!(back.history_size, config.history_size);
    }
}
