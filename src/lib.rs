//! Typed, normalized view over the loosely structured vehicle state returned
//! by a connected-vehicle telemetry backend.

pub mod adapters;
pub mod app;
pub mod domain;
