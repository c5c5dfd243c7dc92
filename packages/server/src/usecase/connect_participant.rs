//! UseCase: 参加者接続処理
//!
//! ### 何をテストしているか
//! - ニックネームの検証と重複チェック
//! - 参加通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 異常系：不正なニックネーム、重複したニックネーム

use std::sync::Arc;

use cdc_feed_shared::{nickname::validate, time::Clock};

use crate::{
    domain::{MessagePusher, Participant, ParticipantRepository, PusherChannel, RepositoryError},
    metrics::MetricsRegistry,
};

use super::{broadcast_and_record, error::ConnectError};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    metrics: Arc<MetricsRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
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

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 接続パスのクライアント ID
    /// * `nickname` - クエリで渡されたニックネーム（未検証）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 接続成功
    /// * `Err(ConnectError)` - 検証失敗またはニックネーム重複
    pub async fn execute(
        &self,
        client_id: String,
        nickname: Option<&str>,
        sender: PusherChannel,
    ) -> Result<Participant, ConnectError> {
        // 1. ニックネームの検証
        let nickname = validate(nickname.unwrap_or_default())?;

        // 2. Repository に参加者を追加（重複チェックを含む）
        let participant = Participant::new(client_id, nickname, self.clock.now_millis());
        self.repository
            .add_participant(participant.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateNickname(nickname) => {
                    ConnectError::DuplicateNickname(nickname)
                }
            })?;

        // 3. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(participant.key().to_string(), sender)
            .await;

        Ok(participant)
    }

    /// 参加者が join したことを全員（本人を含む）にブロードキャスト
    pub async fn broadcast_participant_joined(&self, participant: &Participant) -> usize {
        let message = format!("Client {} joined the chat", participant.nickname);
        let targets = self
            .repository
            .get_participants()
            .await
            .iter()
            .map(|p| p.key().to_string())
            .collect();

        broadcast_and_record(
            self.message_pusher.as_ref(),
            &self.metrics,
            targets,
            &message,
            self.clock.now_millis(),
        )
        .await
    }
}
