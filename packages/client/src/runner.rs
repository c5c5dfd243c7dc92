//! Client event loop.
//!
//! Wires the [`App`] to the outside world: the line editor thread, the
//! WebSocket transport, reconnection timers, the metrics poller and stdout.

use std::{ops::ControlFlow, sync::Arc};

use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use tokio::sync::mpsc;

use cdc_feed_shared::time::{Clock, SystemClock};

use crate::{
    app::{App, Command},
    config::ClientConfig,
    connection::Connection,
    error::ClientError,
    event::AppEvent,
    formatter::MessageFormatter,
    metrics::{HttpMetricsSource, MetricsPoller},
    ui::{ComposerHelper, PROMPT, print_above_prompt},
};

/// Run the client until the user quits
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<AppEvent>();

    let source = HttpMetricsSource::new(config.metrics_url.clone(), config.request_timeout)?;
    let poller = MetricsPoller::new(Arc::new(source), config.poll_interval, events_tx.clone());

    tracing::info!(
        "Starting client (server: {}, metrics: {})",
        config.server_url,
        config.metrics_url
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let started_at = clock.now_millis();
    let mut app = App::new(config, clock, poller);
    print!(
        "{}",
        MessageFormatter::format_banner(app.session().client_id(), started_at)
    );

    spawn_line_reader(events_tx.clone());

    let mut connection: Option<Connection> = None;
    if execute(app.start(), &mut connection, &events_tx).is_break() {
        return Ok(());
    }

    while let Some(event) = events_rx.recv().await {
        let commands = app.handle(event);
        if execute(commands, &mut connection, &events_tx).is_break() {
            break;
        }
    }

    tracing::info!("Client stopped");
    Ok(())
}

fn execute(
    commands: Vec<Command>,
    connection: &mut Option<Connection>,
    events: &mpsc::UnboundedSender<AppEvent>,
) -> ControlFlow<()> {
    for command in commands {
        match command {
            Command::Open { url, attempt } => {
                tracing::info!(attempt, "Connecting to {}", url);
                // Replacing the handle drops the previous connection.
                *connection = Some(Connection::open(url, attempt, events.clone()));
            }
            Command::Close => {
                if let Some(connection) = connection.take() {
                    tracing::debug!(attempt = connection.attempt(), "Closing connection");
                    connection.close();
                }
            }
            Command::Send(text) => match connection.as_ref() {
                Some(connection) => {
                    if let Err(e) = connection.send(text) {
                        tracing::warn!("Failed to send message: {}", e);
                    }
                }
                None => tracing::warn!("No open connection; message dropped"),
            },
            Command::ScheduleReconnect { attempt, delay } => {
                tracing::info!(
                    attempt,
                    "Reconnecting in {} seconds...",
                    delay.as_secs_f64()
                );
                let events = events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    // The loop may have ended while the timer was armed.
                    let _ = events.send(AppEvent::ReconnectDue { attempt });
                });
            }
            Command::Render(screen) => {
                print_above_prompt(&MessageFormatter::format_screen(&screen));
            }
            Command::Quit => return ControlFlow::Break(()),
        }
    }
    ControlFlow::Continue(())
}

/// Read lines on a dedicated thread (rustyline is synchronous).
///
/// Enter submits the line; the composer hint shows its character count.
fn spawn_line_reader(events: mpsc::UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        let mut rl = match Editor::<ComposerHelper, DefaultHistory>::new() {
            Ok(mut rl) => {
                rl.set_helper(Some(ComposerHelper));
                rl
            }
            Err(e) => {
                tracing::error!("{}", ClientError::Readline(e.to_string()));
                let _ = events.send(AppEvent::InputClosed);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if events.send(AppEvent::Input(line)).is_err() {
                        // Event loop has stopped
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    let _ = events.send(AppEvent::InputClosed);
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    let _ = events.send(AppEvent::InputClosed);
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    let _ = events.send(AppEvent::InputClosed);
                    break;
                }
            }
        }
    });
}
