//! Error types for the rssi-motion crate.
//!
//! Most failure modes inside the pipeline degrade to "no event this cycle"
//! rather than surfacing here: too few samples for calibration or feature
//! extraction yields an empty result, and a degenerate filter run falls back
//! to the raw reading. The variants below cover the conditions that a caller
//! must actually handle -- invalid construction parameters and failures at
//! the acquisition boundary.

use thiserror::Error;

/// Errors that can occur while constructing or driving the sensing pipeline.
#[derive(Debug, Error)]
pub enum MotionError {
    /// A configuration value is outside its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The filter input is too short or contains non-finite values.
    ///
    /// Callers inside the pipeline catch this and fall back to the raw
    /// reading; it is public so that direct users of [`ButterworthFilter`]
    /// can do the same.
    ///
    /// [`ButterworthFilter`]: crate::filter::ButterworthFilter
    #[error("filter input degenerate: {reason} (len {len})")]
    FilterDegenerate {
        /// Why the input could not be filtered.
        reason: String,
        /// Length of the offending input.
        len: usize,
    },

    /// The scan backend failed to produce a batch.
    #[error("scan failed: {0}")]
    ScanFailed(String),

    /// The requested operation is not supported by this scan source.
    #[error("unsupported scan source: {0}")]
    Unsupported(String),

    /// A zone referenced by id does not exist.
    #[error("zone not found: {0}")]
    ZoneNotFound(String),
}
