//! The primary port for RSSI acquisition.

use crate::domain::reading::Reading;
use crate::Result;

/// Port that abstracts the platform scan backend.
///
/// One invocation yields one finite batch of readings. An empty batch means
/// "scan produced nothing this cycle" and is a no-op for the pipeline, never
/// an error; implementations reserve `Err` for hard failures at the
/// acquisition boundary (unsupported platform, broken subprocess).
///
/// Implementations in this crate: [`ReplaySource`]. Platform scanners
/// (shelling out to OS utilities and parsing their output) live with the
/// host application.
///
/// [`ReplaySource`]: crate::port::replay::ReplaySource
pub trait ScanSource: Send {
    /// Acquire the next batch of readings.
    fn scan(&mut self) -> Result<Vec<Reading>>;
}
