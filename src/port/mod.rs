//! Acquisition boundary: the port the pipeline consumes batches through.

pub mod replay;
pub mod scan_port;
