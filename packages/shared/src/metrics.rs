//! Metrics document exchanged over `GET /api/metrics`.
//!
//! Field names are camelCase on the wire. Every field has a default so that a
//! document missing some counters still decodes, and unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Per-operation CDC counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationCounts {
    pub create: u64,
    pub update: u64,
    pub delete: u64,
}

impl OperationCounts {
    /// Sum of the three counters, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.create
            .saturating_add(self.update)
            .saturating_add(self.delete)
    }
}

/// One metrics snapshot as served by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub connected_users: u64,
    pub messages_per_minute: f64,
    pub topic_count: u64,
    pub cdc_events_per_sec: f64,
    pub bytes_per_sec: f64,
    pub total_messages: u64,
    pub uptime_seconds: u64,
    pub active_nicknames: Vec<String>,
    /// Operation counts over the last 24 hours
    pub events24h: OperationCounts,
    /// Operation counts since the backend started
    pub cdc_events: OperationCounts,
}
