//! MessagePusher trait 定義
//!
//! 接続中のクライアントへテキストを届けるためのインターフェース。
//! WebSocket などの具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Push failed: {0}")]
    PushFailed(String),
}

/// Outbound delivery to connected clients, keyed by participant key
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the outbound channel of a client
    async fn register_client(&self, key: String, sender: PusherChannel);

    /// Drop the outbound channel of a client
    async fn unregister_client(&self, key: &str);

    /// Push a text to every listed client.
    ///
    /// Returns the number of clients the text was handed to; individual
    /// failures are logged and skipped.
    async fn broadcast(&self, targets: Vec<String>, content: &str) -> usize;
}
