//! Request handlers.

mod http;
mod websocket;

pub use http::{get_metrics, health_check, ingest_cdc};
pub use websocket::websocket_handler;
