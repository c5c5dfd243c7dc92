//! WebSocket transport for one connection attempt.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use cdc_feed_shared::protocol::{ABNORMAL_CLOSURE, NO_STATUS_RECEIVED};

use crate::{
    error::ClientError,
    event::{AppEvent, TransportEvent},
};

/// Requests from the event loop to the connection task
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Handle on one connection attempt.
///
/// The connection itself runs on a spawned task that reports everything it
/// observes as [`AppEvent::Transport`] tagged with the attempt number. Dropping
/// the handle closes the connection.
#[derive(Debug)]
pub struct Connection {
    attempt: u64,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    /// Start connecting to `url` in the background
    pub fn open(url: String, attempt: u64, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(url, attempt, events, outbound_rx));
        Self { attempt, outbound }
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Queue a text frame
    pub fn send(&self, text: String) -> Result<(), ClientError> {
        self.outbound
            .send(Outbound::Text(text))
            .map_err(|_| ClientError::ConnectionError("connection task has ended".to_string()))
    }

    /// Ask the connection task to send a close frame and stop
    pub fn close(&self) {
        // The task may already be gone, in which case there is nothing to close.
        let _ = self.outbound.send(Outbound::Close);
    }
}

fn emit(events: &mpsc::UnboundedSender<AppEvent>, attempt: u64, event: TransportEvent) {
    if events.send(AppEvent::Transport { attempt, event }).is_err() {
        tracing::debug!("Event loop has stopped; dropping transport event");
    }
}

fn emit_failure(events: &mpsc::UnboundedSender<AppEvent>, attempt: u64, message: String) {
    emit(events, attempt, TransportEvent::Error(message));
    emit(
        events,
        attempt,
        TransportEvent::Closed {
            code: ABNORMAL_CLOSURE,
            reason: String::new(),
        },
    );
}

/// Run one connection attempt until it closes
async fn run_connection(
    url: String,
    attempt: u64,
    events: mpsc::UnboundedSender<AppEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
) {
    tracing::info!("Connecting to {} (attempt {})", url, attempt);

    let (ws_stream, _response) = match connect_async(url.as_str()).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Failed to connect to {}: {}", url, e);
            emit_failure(&events, attempt, e.to_string());
            return;
        }
    };

    tracing::info!("Connected to {}", url);
    emit(&events, attempt, TransportEvent::Opened);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    emit(&events, attempt, TransportEvent::Frame(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or((NO_STATUS_RECEIVED, String::new()));
                    tracing::info!("Server closed the connection ({}): {}", code, reason);
                    emit(&events, attempt, TransportEvent::Closed { code, reason });
                    break;
                }
                // Ping/pong is handled by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    emit_failure(&events, attempt, e.to_string());
                    break;
                }
                None => {
                    tracing::info!("Connection ended without a close frame");
                    emit(
                        &events,
                        attempt,
                        TransportEvent::Closed {
                            code: ABNORMAL_CLOSURE,
                            reason: String::new(),
                        },
                    );
                    break;
                }
            },
            command = outbound_rx.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        emit_failure(&events, attempt, e.to_string());
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    tracing::info!("Closing connection (attempt {})", attempt);
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            },
        }
    }
}
