//! Error types for the CDC feed client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client used for metrics polling could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The line editor could not be started
    #[error("Failed to initialize line editor: {0}")]
    Readline(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors raised while fetching a metrics snapshot
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The request could not be sent or the body could not be read
    #[error("Metrics request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Metrics endpoint returned HTTP {0}")]
    Status(u16),

    /// The body was not a metrics document
    #[error("Failed to decode metrics document: {0}")]
    Decode(#[from] serde_json::Error),
}
