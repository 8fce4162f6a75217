//! # rssi-motion
//!
//! Indoor motion sensing from WiFi RSSI fluctuations.
//!
//! A body moving between a receiver and an access point perturbs multipath
//! propagation, producing a transient shift in received signal strength
//! relative to a quiet-room baseline. This crate turns raw periodic RSSI
//! samples per network identifier into discrete, confidence-scored motion
//! events, optionally attributed to a named physical zone:
//!
//! - **Domain types**: [`Reading`], [`DetectionEvent`], [`Zone`]
//! - **Baselines**: [`BaselineStore`] -- explicit calibration plus automatic
//!   bootstrap from ambient samples
//! - **Smoothing**: [`ButterworthFilter`] -- zero-phase low-pass over the
//!   per-identifier history window
//! - **Scoring**: [`MotionDetector`] -- deviation test against baseline with
//!   bounded confidence
//! - **Attribution**: [`ZoneMapper`] -- direct device-to-zone assignment and
//!   score-based multi-signal fallback
//! - **Port**: [`ScanSource`] -- trait abstracting the acquisition backend
//!
//! # Example
//!
//! ```rust
//! use rssi_motion::{PipelineConfig, Reading, SensingPipeline};
//!
//! let config = PipelineConfig::builder()
//!     .threshold(10.0)
//!     .sensitivity(1.0)
//!     .build();
//!
//! let mut pipeline = SensingPipeline::new(config).unwrap();
//!
//! let batch = vec![Reading::now("HomeNet", -62)];
//! let events = pipeline.process_batch(&batch);
//! assert!(events.is_empty()); // not yet calibrated
//! ```

pub mod baseline;
pub mod config;
pub mod detector;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod port;
pub mod stats;
pub mod zones;

// Re-export main types for convenience.
pub use baseline::{BaselineStore, CalibrationReport};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use detector::{DetectorStatistics, MotionDetector, SignalFeatures};
pub use domain::event::DetectionEvent;
pub use domain::history::HistoryStore;
pub use domain::reading::{Reading, SignalQuality};
pub use domain::zone::{Zone, ZoneConfig};
pub use error::MotionError;
pub use filter::ButterworthFilter;
pub use pipeline::SensingPipeline;
pub use port::replay::ReplaySource;
pub use port::scan_port::ScanSource;
pub use zones::ZoneMapper;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for pipeline operations
pub type Result<T> = std::result::Result<T, MotionError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::detector::MotionDetector;
    pub use crate::domain::event::DetectionEvent;
    pub use crate::domain::reading::Reading;
    pub use crate::pipeline::SensingPipeline;
    pub use crate::port::scan_port::ScanSource;
    pub use crate::zones::ZoneMapper;
    pub use crate::{MotionError, Result};
}
