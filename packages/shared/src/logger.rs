//! Logging setup utilities for the CDC feed binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the binary, the client and server crates, the shared
/// crate and HTTP request traces.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "cdc-feed-server", "cdc-feed-client")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use cdc_feed_shared::logger::setup_logger;
///
/// setup_logger("cdc-feed-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the `EnvFilter` directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let package_target = binary_target.trim_end_matches("_client").to_string();
    let package_target = package_target.trim_end_matches("_server");

    format!(
        "{binary}={level},{package}_client={level},{package}_server={level},{shared}={level},tower_http={level}",
        binary = binary_target,
        package = package_target,
        shared = env!("CARGO_PKG_NAME").replace('-', "_"),
        level = default_log_level,
    )
}
