//! Events delivered to the client's event loop.

use cdc_feed_shared::metrics::MetricsSnapshot;

use crate::error::MetricsError;

/// What the transport observed on one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The WebSocket handshake completed
    Opened,
    /// A text frame arrived
    Frame(String),
    /// The connection ended; emitted exactly once per attempt
    Closed { code: u16, reason: String },
    /// The connection failed (connect error, read or write error)
    Error(String),
}

/// Everything the event loop reacts to
#[derive(Debug)]
pub enum AppEvent {
    /// A line entered by the user
    Input(String),
    /// The input stream ended (Ctrl+C / Ctrl+D)
    InputClosed,
    /// Something happened on a connection attempt
    Transport {
        attempt: u64,
        event: TransportEvent,
    },
    /// The reconnection timer armed for `attempt` fired
    ReconnectDue { attempt: u64 },
    /// A metrics poll of the given poller generation completed
    MetricsPolled {
        generation: u64,
        result: Result<MetricsSnapshot, MetricsError>,
    },
}
