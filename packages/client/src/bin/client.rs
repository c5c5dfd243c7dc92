//! Terminal client for a live CDC event feed.
//!
//! Asks for a nickname, connects to the backend's WebSocket event channel and
//! prints every change notification as it arrives. `/dashboard` switches to a
//! metrics dashboard polled every 2 seconds. Dropped connections are retried
//! every 3 seconds; a nickname rejected by the server brings the prompt back.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cdc-feed-client
//! cargo run --bin cdc-feed-client -- --nickname Nightwing
//! cargo run --bin cdc-feed-client -- -n Oracle -u ws://127.0.0.1:8000 -m http://127.0.0.1:8000/api/metrics
//! ```

use clap::Parser;

use cdc_feed_client::config::{ClientConfig, DEFAULT_SERVER_URL};
use cdc_feed_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "cdc-feed-client")]
#[command(about = "Terminal client for a live CDC event feed and metrics dashboard", long_about = None)]
struct Args {
    /// Nickname to join with (validated like a typed one)
    #[arg(short = 'n', long)]
    nickname: Option<String>,

    /// WebSocket base URL of the backend
    #[arg(short = 'u', long, default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// URL of the metrics document
    #[arg(short = 'm', long, default_value = "http://127.0.0.1:8000/api/metrics")]
    metrics_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    let config = ClientConfig::new(args.url, args.metrics_url).with_nickname(args.nickname);

    if let Err(e) = cdc_feed_client::run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
