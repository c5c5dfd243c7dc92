//! Development backend for the CDC feed client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cdc-feed-server
//! cargo run --bin cdc-feed-server -- --port 9000 --entity Villain -t pg.public.villains
//! ```

use std::sync::Arc;

use cdc_feed_server::{
    cdc::{DEFAULT_ENTITY, DEFAULT_TOPIC},
    ui::{Server, ServerConfig, build_state},
};
use cdc_feed_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cdc-feed-server")]
#[command(about = "Development backend for the CDC feed client", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8000")]
    port: u16,

    /// Entity label used in CDC lines
    #[arg(short = 'e', long, default_value = DEFAULT_ENTITY)]
    entity: String,

    /// Topic reported by the metrics document (repeatable)
    #[arg(short = 't', long = "topic", default_values_t = [DEFAULT_TOPIC.to_string()])]
    topics: Vec<String>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = ServerConfig {
        entity: args.entity,
        topics: args.topics,
    };
    tracing::info!("Serving entity '{}' from {:?}", config.entity, config.topics);

    let state = build_state(&config, Arc::new(SystemClock));
    if let Err(e) = Server::new(state).run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
