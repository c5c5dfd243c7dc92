//! UseCase: メッセージ送信処理
//!
//! クライアントから届いたテキストを "Client {nickname}: {text}" として
//! 送信者以外の全員にブロードキャストする。送信者はローカルで表示済み。

use std::sync::Arc;

use cdc_feed_shared::time::Clock;

use crate::{
    domain::{MessagePusher, Participant, ParticipantRepository},
    metrics::MetricsRegistry,
};

use super::broadcast_and_record;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    metrics: Arc<MetricsRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        metrics: Arc<MetricsRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            metrics,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// メッセージを受け取ったクライアント数
    pub async fn execute(&self, from: &Participant, text: &str) -> usize {
        let now = self.clock.now_millis();
        let message = format!("Client {}: {}", from.nickname, text);

        let targets = self
            .repository
            .get_participants()
            .await
            .iter()
            .filter(|p| p.key() != from.key())
            .map(|p| p.key().to_string())
            .collect();

        self.metrics.record_chat(now).await;
        broadcast_and_record(
            self.message_pusher.as_ref(),
            &self.metrics,
            targets,
            &message,
            now,
        )
        .await
    }
}
