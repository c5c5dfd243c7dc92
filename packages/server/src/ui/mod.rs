//! HTTP and WebSocket surface of the backend.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, build_state, router};
