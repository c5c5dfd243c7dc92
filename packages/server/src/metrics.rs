//! In-memory metrics registry.
//!
//! Records chat messages, CDC events and broadcast bytes with their timestamps
//! and derives the rolling figures served by `GET /api/metrics`.

use std::collections::VecDeque;

use tokio::sync::Mutex;

use cdc_feed_shared::metrics::{MetricsSnapshot, OperationCounts};

use crate::cdc::Operation;

const MINUTE_MILLIS: i64 = 60_000;
const DAY_MILLIS: i64 = 24 * 60 * MINUTE_MILLIS;

#[derive(Debug, Default)]
struct Records {
    chat: VecDeque<i64>,
    cdc: VecDeque<(i64, Operation)>,
    bytes: VecDeque<(i64, u64)>,
    total_messages: u64,
    lifetime: OperationCounts,
}

impl Records {
    /// Drop entries that no window needs any more
    fn prune(&mut self, now: i64) {
        while self.chat.front().is_some_and(|at| now - at >= MINUTE_MILLIS) {
            self.chat.pop_front();
        }
        while self.bytes.front().is_some_and(|(at, _)| now - at >= MINUTE_MILLIS) {
            self.bytes.pop_front();
        }
        while self.cdc.front().is_some_and(|(at, _)| now - at >= DAY_MILLIS) {
            self.cdc.pop_front();
        }
    }
}

/// Figures derived by the registry alone; connection data is added by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rates {
    pub messages_per_minute: f64,
    pub cdc_events_per_sec: f64,
    pub bytes_per_sec: f64,
    pub total_messages: u64,
    pub uptime_seconds: u64,
    pub events24h: OperationCounts,
    pub cdc_events: OperationCounts,
}

impl Rates {
    /// Complete a snapshot with connection figures
    pub fn into_snapshot(self, active_nicknames: Vec<String>, topic_count: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            connected_users: active_nicknames.len() as u64,
            messages_per_minute: self.messages_per_minute,
            topic_count,
            cdc_events_per_sec: self.cdc_events_per_sec,
            bytes_per_sec: self.bytes_per_sec,
            total_messages: self.total_messages,
            uptime_seconds: self.uptime_seconds,
            active_nicknames,
            events24h: self.events24h,
            cdc_events: self.cdc_events,
        }
    }
}

/// Rolling counters of backend activity
#[derive(Debug)]
pub struct MetricsRegistry {
    started_at: i64,
    records: Mutex<Records>,
}

impl MetricsRegistry {
    /// Create a registry whose uptime counts from `started_at` (Unix milliseconds)
    pub fn new(started_at: i64) -> Self {
        Self {
            started_at,
            records: Mutex::new(Records::default()),
        }
    }

    /// Record a chat message relayed at `at`
    pub async fn record_chat(&self, at: i64) {
        let mut records = self.records.lock().await;
        records.prune(at);
        records.chat.push_back(at);
        records.total_messages += 1;
    }

    /// Record a CDC event broadcast at `at`
    pub async fn record_change(&self, at: i64, operation: Operation) {
        let mut records = self.records.lock().await;
        records.prune(at);
        records.cdc.push_back((at, operation));
        records.total_messages += 1;
        if let Some(counter) = counter_mut(&mut records.lifetime, operation) {
            *counter += 1;
        }
    }

    /// Record `bytes` handed to client channels at `at`
    pub async fn record_bytes(&self, at: i64, bytes: u64) {
        if bytes == 0 {
            return;
        }
        let mut records = self.records.lock().await;
        records.prune(at);
        records.bytes.push_back((at, bytes));
    }

    /// Derive the rolling figures as of `now`
    pub async fn rates(&self, now: i64) -> Rates {
        let mut records = self.records.lock().await;
        records.prune(now);

        let window_secs = (MINUTE_MILLIS / 1000) as f64;
        let cdc_last_minute = records
            .cdc
            .iter()
            .filter(|(at, _)| now - at < MINUTE_MILLIS)
            .count();
        let bytes_last_minute: u64 = records.bytes.iter().map(|(_, bytes)| bytes).sum();

        let mut events24h = OperationCounts::default();
        for (_, operation) in &records.cdc {
            if let Some(counter) = counter_mut(&mut events24h, *operation) {
                *counter += 1;
            }
        }

        Rates {
            messages_per_minute: records.chat.len() as f64,
            cdc_events_per_sec: cdc_last_minute as f64 / window_secs,
            bytes_per_sec: bytes_last_minute as f64 / window_secs,
            total_messages: records.total_messages,
            uptime_seconds: ((now - self.started_at).max(0) / 1000) as u64,
            events24h,
            cdc_events: records.lifetime,
        }
    }
}

/// Snapshot reads are not part of the create / update / delete breakdown
fn counter_mut(counts: &mut OperationCounts, operation: Operation) -> Option<&mut u64> {
    match operation {
        Operation::Create => Some(&mut counts.create),
        Operation::Update => Some(&mut counts.update),
        Operation::Delete => Some(&mut counts.delete),
        Operation::Snapshot => None,
    }
}
