//! Motion detection event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discrete motion event emitted by the anomaly scorer.
///
/// Events are created exclusively on a positive detection and are immutable
/// afterwards, with one exception: the [`ZoneMapper`] may set the `zone`
/// field exactly once when it attributes the event to a physical region.
///
/// [`ZoneMapper`]: crate::zones::ZoneMapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// When the triggering reading was taken.
    pub timestamp: DateTime<Utc>,

    /// Network identifier that triggered the detection.
    pub identifier: String,

    /// The raw (unfiltered) RSSI at detection time, in dBm.
    pub rssi_current: i32,

    /// The baseline the reading was compared against, in dBm.
    pub baseline: f64,

    /// Absolute deviation of the filtered reading from the baseline.
    pub deviation: f64,

    /// Zone the event was attributed to, if any.
    ///
    /// `None` means "unknown location", not an error: the identifier is
    /// simply not assigned to any configured zone.
    pub zone: Option<String>,

    /// Detection confidence in [0, 100].
    pub confidence: f64,
}

impl DetectionEvent {
    /// Attribute this event to a zone. Only the first attribution sticks.
    pub(crate) fn attribute_zone(&mut self, zone_id: &str) {
        if self.zone.is_none() {
            self.zone = Some(zone_id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event() -> DetectionEvent {
        DetectionEvent {
            timestamp: Utc::now(),
            identifier: "TestNetwork".to_string(),
            rssi_current: -50,
            baseline: -60.0,
            deviation: 10.0,
            zone: None,
            confidence: 85.5,
        }
    }

    #[test]
    fn zone_set_at_most_once() {
        let mut event = make_event();
        event.attribute_zone("living-room");
        assert_eq!(event.zone.as_deref(), Some("living-room"));

        event.attribute_zone("kitchen");
        assert_eq!(event.zone.as_deref(), Some("living-room"));
    }

    #[test]
    fn serializes_round_trip() {
        let event = make_event();
        let json = serde_json::to_string(&event).unwrap();
        let back: DetectionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
