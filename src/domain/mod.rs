//! Domain types for the sensing pipeline.

pub mod event;
pub mod history;
pub mod reading;
pub mod zone;
