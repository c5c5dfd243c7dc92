//! Terminal client for a live change-data-capture feed.
//!
//! The client opens a WebSocket to the backend once a nickname has passed the
//! handshake, classifies every inbound notification into a feed entry, and
//! keeps a dashboard of backend metrics that is polled over HTTP while the
//! dashboard view is shown.
//!
//! All client state lives in [`app::App`] and is only mutated from one event
//! loop; transport tasks, timers and the metrics poller talk to it through
//! [`event::AppEvent`]s.

pub mod app;
pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod formatter;
pub mod handshake;
pub mod metrics;
pub mod router;
pub mod runner;
pub mod session;
pub mod ui;
pub mod view;

pub use runner::run_client;
