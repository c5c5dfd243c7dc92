//! Addressing and close-code conventions of the event channel.

/// Close code sent by the server when it refuses the supplied nickname
/// (WebSocket "policy violation").
pub const POLICY_VIOLATION: u16 = 1008;

/// Close code reported when a connection ends without a close frame
/// (WebSocket "abnormal closure").
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Close code reported when a close frame carries no status
/// (WebSocket "no status received").
pub const NO_STATUS_RECEIVED: u16 = 1005;

/// Path of the metrics document
pub const METRICS_PATH: &str = "/api/metrics";

/// Path of the Debezium envelope ingest endpoint
pub const CDC_INGEST_PATH: &str = "/api/cdc";

/// Query parameter carrying the URL-encoded nickname
pub const NICKNAME_PARAM: &str = "nickname";

/// Returns `true` if a close code means the server rejected the nickname.
pub fn is_policy_rejection(code: u16) -> bool {
    code == POLICY_VIOLATION
}
