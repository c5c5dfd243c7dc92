//! WebSocket を使った MessagePusher 実装
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// `clients`: 接続中のクライアントと対応する WebSocket sender のマップ
pub struct WebSocketMessagePusher {
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }

    async fn push(&self, key: &str, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(key)
            .ok_or_else(|| MessagePushError::ClientNotFound(key.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, key: String, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", key);
        clients.insert(key, sender);
    }

    async fn unregister_client(&self, key: &str) {
        let mut clients = self.clients.lock().await;
        clients.remove(key);
        tracing::debug!("Client '{}' unregistered from MessagePusher", key);
    }

    async fn broadcast(&self, targets: Vec<String>, content: &str) -> usize {
        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match self.push(&target, content).await {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
                Err(e) => tracing::warn!("Failed to push message to '{}': {}", target, e),
            }
        }
        delivered
    }
}
