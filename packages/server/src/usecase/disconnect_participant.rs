//! UseCase: 参加者切断処理

use std::sync::Arc;

use cdc_feed_shared::time::Clock;

use crate::{
    domain::{MessagePusher, Participant, ParticipantRepository},
    metrics::MetricsRegistry,
};

use super::broadcast_and_record;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    metrics: Arc<MetricsRegistry>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 削除された参加者（既に削除済みの場合は `None`）
    pub async fn execute(&self, participant: &Participant) -> Option<Participant> {
        self.message_pusher
            .unregister_client(participant.key())
            .await;
        self.repository.remove_participant(participant.key()).await
    }

    /// 参加者が leave したことを残りの参加者にブロードキャスト
    pub async fn broadcast_participant_left(&self, participant: &Participant) -> usize {
        let message = format!("Client {} left the chat", participant.nickname);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::MockMessagePusher,
        infrastructure::{InMemoryParticipantRepository, WebSocketMessagePusher},
    };
    use cdc_feed_shared::{nickname::validate, time::FixedClock};
    use tokio::sync::mpsc;

    const NOW: i64 = 1_700_000_000_000;

    fn participant(nickname: &str) -> Participant {
        Participant::new("1".to_string(), validate(nickname).unwrap(), NOW)
    }

    fn create_usecase(
        repository: Arc<InMemoryParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(
            repository,
            message_pusher,
            Arc::new(MetricsRegistry::new(NOW)),
            Arc::new(FixedClock::new(NOW)),
        )
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 切断した参加者が Repository と MessagePusher から削除される
        // given (前提条件):
        let repository = Arc::new(InMemoryParticipantRepository::new());
        repository
            .add_participant(participant("Oracle"))
            .await
            .unwrap();
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_unregister_client()
            .withf(|key| key == "Oracle")
            .times(1)
            .return_const(());
        let usecase = create_usecase(repository.clone(), Arc::new(message_pusher));

        // when (操作):
        let removed = usecase.execute(&participant("Oracle")).await;

        // then (期待する結果):
        assert!(removed.is_some());
        assert_eq!(repository.count_participants().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_participant_left_reaches_remaining() {
        // テスト項目: 退出通知は残りの参加者にのみ届く
        // given (前提条件):
        let repository = Arc::new(InMemoryParticipantRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        for (nickname, tx) in [("Oracle", tx1), ("Nightwing", tx2)] {
            repository
                .add_participant(participant(nickname))
                .await
                .unwrap();
            message_pusher.register_client(nickname.to_string(), tx).await;
        }
        let usecase = create_usecase(repository.clone(), message_pusher);
        let nightwing = participant("Nightwing");
        usecase.execute(&nightwing).await;

        // when (操作):
        let delivered = usecase.broadcast_participant_left(&nightwing).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(
            rx1.recv().await,
            Some("Client Nightwing left the chat".to_string())
        );
        assert!(rx2.try_recv().is_err());
    }
}
