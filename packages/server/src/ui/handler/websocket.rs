//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{domain::Participant, ui::state::AppState};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub nickname: Option<String>,
}

/// The connection is always upgraded; a refused nickname is reported with a
/// policy-violation close frame so the client can show the reason.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, client_id, query.nickname))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for messages addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Close the socket with 1008 and `reason`, then wait for the peer's close reply
async fn reject(mut socket: WebSocket, reason: String) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: reason.into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::warn!("Failed to send close frame: {}", e);
        return;
    }
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Close(_) = msg {
            break;
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_id: String,
    nickname: Option<String>,
) {
    let (tx, rx) = mpsc::unbounded_channel();

    // (register_client is called inside the UseCase)
    let participant = match state
        .connect_participant_usecase
        .execute(client_id.clone(), nickname.as_deref(), tx)
        .await
    {
        Ok(participant) => participant,
        Err(e) => {
            tracing::warn!("Rejecting client '{}': {}", client_id, e);
            reject(socket, e.to_string()).await;
            return;
        }
    };
    tracing::info!(
        "Client '{}' connected as '{}'",
        client_id,
        participant.nickname
    );

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let delivered = state
        .connect_participant_usecase
        .broadcast_participant_joined(&participant)
        .await;
    tracing::debug!("Broadcasted join of '{}' to {} clients", participant.nickname, delivered);

    let state_clone = state.clone();
    let participant_clone = participant.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::info!("Received from '{}': {}", participant_clone.nickname, text);
                    state_clone
                        .send_message_usecase
                        .execute(&participant_clone, text.as_str())
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", participant_clone.nickname);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    leave(&state, &participant).await;
}

async fn leave(state: &AppState, participant: &Participant) {
    if state
        .disconnect_participant_usecase
        .execute(participant)
        .await
        .is_none()
    {
        tracing::warn!("Participant '{}' was already removed", participant.nickname);
        return;
    }
    tracing::info!("Client '{}' disconnected", participant.nickname);

    state
        .disconnect_participant_usecase
        .broadcast_participant_left(participant)
        .await;
}
