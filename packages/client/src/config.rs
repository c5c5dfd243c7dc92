//! Client configuration.

use std::time::Duration;

use cdc_feed_shared::protocol::METRICS_PATH;

/// Delay before a dropped connection is retried
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Interval between metrics polls while the dashboard is shown
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Number of points kept by the dashboard chart
pub const CHART_CAPACITY: usize = 20;

/// Timeout of one metrics request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default WebSocket base URL of the backend
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8000";

/// Runtime configuration of the client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// WebSocket base URL; the event channel lives at `{server_url}/ws/{client_id}`
    pub server_url: String,
    /// Full URL of the metrics document
    pub metrics_url: String,
    /// Nickname offered to the handshake at startup, if any
    pub nickname: Option<String>,
    pub reconnect_delay: Duration,
    pub poll_interval: Duration,
    pub chart_capacity: usize,
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given endpoints with the default timings
    pub fn new(server_url: impl Into<String>, metrics_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            metrics_url: metrics_url.into(),
            ..Self::default()
        }
    }

    /// Offer a nickname to the handshake at startup
    pub fn with_nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            metrics_url: format!("http://127.0.0.1:8000{}", METRICS_PATH),
            nickname: None,
            reconnect_delay: RECONNECT_DELAY,
            poll_interval: POLL_INTERVAL,
            chart_capacity: CHART_CAPACITY,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}
