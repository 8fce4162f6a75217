//! Zone entity: an operator-defined physical area of the monitored space.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named physical region associated with one or more access points.
///
/// Zones are created from static configuration at startup. At runtime only
/// `active` and `last_motion` change, and only the [`ZoneMapper`] mutates
/// them; other components read zone snapshots through its query interface.
///
/// [`ZoneMapper`]: crate::zones::ZoneMapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique zone id.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Approximate (x, y) position of the zone within the floor plan.
    pub position: (f64, f64),

    /// Identifiers of the access points assigned to this zone.
    pub device_identifiers: BTreeSet<String>,

    /// Whether motion has been attributed to this zone since the last reset.
    ///
    /// Sticky: stays `true` until [`ZoneMapper::reset_zone_states`] clears it.
    ///
    /// [`ZoneMapper::reset_zone_states`]: crate::zones::ZoneMapper::reset_zone_states
    pub active: bool,

    /// Timestamp of the most recent attributed motion event.
    pub last_motion: Option<DateTime<Utc>>,
}

impl Zone {
    /// Create an inactive zone with no assigned devices.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            device_identifiers: BTreeSet::new(),
            active: false,
            last_motion: None,
        }
    }

    /// Whether the given identifier is assigned to this zone.
    pub fn has_device(&self, identifier: &str) -> bool {
        self.device_identifiers.contains(identifier)
    }
}

impl From<ZoneConfig> for Zone {
    fn from(config: ZoneConfig) -> Self {
        Self {
            id: config.id,
            name: config.name,
            position: config.position,
            device_identifiers: config.device_identifiers.into_iter().collect(),
            active: false,
            last_motion: None,
        }
    }
}

/// Static zone definition supplied by the configuration collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Unique zone id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Approximate (x, y) position within the floor plan.
    #[serde(default)]
    pub position: (f64, f64),
    /// Identifiers of the access points assigned to this zone.
    #[serde(default)]
    pub device_identifiers: Vec<String>,
}
