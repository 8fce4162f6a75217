//! Reading value object.
//!
//! A `Reading` is a single (identifier, signal strength, timestamp)
//! observation produced by the acquisition collaborator. It is immutable
//! once constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weakest RSSI the model accepts, in dBm.
pub const RSSI_FLOOR_DBM: i32 = -120;

/// Strongest RSSI the model accepts, in dBm.
pub const RSSI_CEILING_DBM: i32 = 0;

/// A single RSSI observation for one network identifier.
///
/// Realistic indoor values fall in [-100, -30] dBm; the constructor clamps
/// anything outside [`RSSI_FLOOR_DBM`], [`RSSI_CEILING_DBM`] so that a
/// misbehaving scan backend can never push an out-of-range value into the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Network identifier (SSID or BSSID, opaque to the pipeline).
    pub identifier: String,

    /// Received signal strength in dBm.
    pub rssi_dbm: i32,

    /// When this observation was taken.
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Create a reading with an explicit timestamp.
    pub fn new(identifier: impl Into<String>, rssi_dbm: i32, timestamp: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            rssi_dbm: rssi_dbm.clamp(RSSI_FLOOR_DBM, RSSI_CEILING_DBM),
            timestamp,
        }
    }

    /// Create a reading timestamped now.
    pub fn now(identifier: impl Into<String>, rssi_dbm: i32) -> Self {
        Self::new(identifier, rssi_dbm, Utc::now())
    }

    /// Signal strength normalized to a 0-100 scale.
    ///
    /// -100 dBm maps to 0, -30 dBm maps to 100, clamped outside that span.
    pub fn signal_pct(&self) -> f64 {
        let clamped = self.rssi_dbm.clamp(-100, -30) as f64;
        ((clamped + 100.0) / 70.0) * 100.0
    }

    /// Coarse link-quality category for this reading.
    pub fn quality(&self) -> SignalQuality {
        SignalQuality::from_rssi(self.rssi_dbm)
    }
}

/// Coarse WiFi link-quality buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    /// -50 dBm or stronger.
    Excellent,
    /// [-60, -50) dBm.
    Good,
    /// [-70, -60) dBm.
    Fair,
    /// Weaker than -70 dBm.
    Weak,
}

impl SignalQuality {
    /// Categorize an RSSI value in dBm.
    pub fn from_rssi(rssi_dbm: i32) -> Self {
        if rssi_dbm >= -50 {
            Self::Excellent
        } else if rssi_dbm >= -60 {
            Self::Good
        } else if rssi_dbm >= -70 {
            Self::Fair
        } else {
            Self::Weak
        }
    }
}
