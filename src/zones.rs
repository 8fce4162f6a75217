//! Zone attribution: mapping motion events to physical regions.
//!
//! The `ZoneMapper` exclusively owns the zone collection. Attribution is a
//! coarse best-effort tag, not triangulation: the primary path is a static
//! device-to-zone assignment, with an auxiliary score-based fallback for
//! simultaneous multi-identifier snapshots.

use std::collections::{BTreeMap, HashMap};

use crate::domain::event::DetectionEvent;
use crate::domain::zone::{Zone, ZoneConfig};
use crate::error::MotionError;
use crate::Result;

/// Owns the zone collection and attributes events to zones.
///
/// Zones are keyed in a `BTreeMap`, so iteration order -- and therefore any
/// tie-break between zones claiming the same identifier or the same score --
/// is deterministic and lexicographic by zone id.
#[derive(Debug, Default)]
pub struct ZoneMapper {
    zones: BTreeMap<String, Zone>,
}

impl ZoneMapper {
    /// Create a mapper with no zones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper from static zone configuration.
    pub fn from_configs(configs: Vec<ZoneConfig>) -> Self {
        let mut mapper = Self::new();
        for config in configs {
            mapper.add_zone(Zone::from(config));
        }
        tracing::info!(zones = mapper.zones.len(), "zone mapper initialized");
        mapper
    }

    /// Add a zone. Replaces any existing zone with the same id.
    pub fn add_zone(&mut self, zone: Zone) {
        tracing::info!(zone_id = %zone.id, name = %zone.name, "zone added");
        self.zones.insert(zone.id.clone(), zone);
    }

    /// Remove a zone by id.
    pub fn remove_zone(&mut self, zone_id: &str) -> Option<Zone> {
        let removed = self.zones.remove(zone_id);
        if let Some(zone) = &removed {
            tracing::info!(zone_id = %zone.id, "zone removed");
        }
        removed
    }

    /// Assign a device identifier to an existing zone.
    pub fn assign_device(&mut self, zone_id: &str, identifier: &str) -> Result<()> {
        let zone = self
            .zones
            .get_mut(zone_id)
            .ok_or_else(|| MotionError::ZoneNotFound(zone_id.to_string()))?;

        if zone.device_identifiers.insert(identifier.to_string()) {
            tracing::info!(zone_id = %zone_id, identifier = %identifier, "device assigned to zone");
        }
        Ok(())
    }

    /// Direct assignment: attribute an event to the zone owning its
    /// identifier.
    ///
    /// Marks the zone active, stamps `last_motion`, and sets the event's
    /// `zone` field. Returns the zone id, or `None` when the identifier is
    /// unassigned -- "unknown location", not an error. If more than one zone
    /// claims the identifier, the lexicographically first zone id wins.
    pub fn attribute(&mut self, event: &mut DetectionEvent) -> Option<String> {
        for (zone_id, zone) in self.zones.iter_mut() {
            if zone.has_device(&event.identifier) {
                zone.active = true;
                zone.last_motion = Some(event.timestamp);
                event.attribute_zone(zone_id);

                tracing::info!(
                    zone_id = %zone_id,
                    identifier = %event.identifier,
                    "motion attributed to zone"
                );
                return Some(zone_id.clone());
            }
        }
        None
    }

    /// Score-based attribution for a simultaneous multi-identifier snapshot.
    ///
    /// Each zone scores the sum over its mapped identifiers of
    /// `rssi + 100`, favoring stronger (less negative) signals. Returns the
    /// zone with the maximum aggregate score, or `None` when no identifier
    /// in the snapshot maps to a configured zone. Equal scores resolve to
    /// the lexicographically first zone id.
    pub fn locate_by_scores(
        &self,
        readings: &HashMap<String, i32>,
        device_zones: &HashMap<String, String>,
    ) -> Option<String> {
        let mut scores: BTreeMap<&str, f64> = BTreeMap::new();

        for (identifier, rssi) in readings {
            if let Some(zone_id) = device_zones.get(identifier) {
                *scores.entry(zone_id.as_str()).or_insert(0.0) += (*rssi + 100) as f64;
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (zone_id, score) in scores {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((zone_id, score)),
            }
        }
        best.map(|(zone_id, _)| zone_id.to_string())
    }

    /// Snapshot of all zones, ordered by id.
    pub fn get_all_zones(&self) -> Vec<Zone> {
        self.zones.values().cloned().collect()
    }

    /// Snapshot of one zone by id.
    pub fn get_zone_by_id(&self, zone_id: &str) -> Option<Zone> {
        self.zones.get(zone_id).cloned()
    }

    /// Snapshot of zones currently marked active.
    pub fn get_active_zones(&self) -> Vec<Zone> {
        self.zones.values().filter(|z| z.active).cloned().collect()
    }

    /// Clear the sticky `active` flag on every zone.
    ///
    /// Callers decide the reset cadence; activity never expires on its own.
    pub fn reset_zone_states(&mut self) {
        for zone in self.zones.values_mut() {
            zone.active = false;
        }
        tracing::debug!("zone states reset");
    }

    /// Number of configured zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are configured.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
