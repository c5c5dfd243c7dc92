//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to a local wall-clock time ("HH:MM:SS").
///
/// Out-of-range timestamps render as "--:--:--".
pub fn timestamp_to_local_time(timestamp_millis: i64) -> String {
    local_datetime(timestamp_millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// Convert a Unix timestamp (milliseconds) to a local RFC 3339 string.
pub fn timestamp_to_local_rfc3339(timestamp_millis: i64) -> String {
    local_datetime(timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

fn local_datetime(timestamp_millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp_millis).single()
}
