//! Development backend for the CDC feed client.
//!
//! Serves the WebSocket event channel, turns Debezium change envelopes posted to
//! `/api/cdc` into feed lines and publishes the metrics document read by the
//! client's dashboard.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod cdc;
pub mod error;
pub mod metrics;
