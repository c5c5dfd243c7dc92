//! UseCase: CDC イベントの取り込み
//!
//! Debezium のエンベロープを 1 行のテキストに変換し、接続中の全員に
//! ブロードキャストする。

use std::sync::Arc;

use cdc_feed_shared::time::Clock;

use crate::{
    cdc::{CdcError, ChangeEnvelope, ChangeNotice, format_change},
    domain::{MessagePusher, ParticipantRepository},
    metrics::MetricsRegistry,
};

use super::broadcast_and_record;

/// CDC イベント取り込みのユースケース
pub struct IngestChangeUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    metrics: Arc<MetricsRegistry>,
    clock: Arc<dyn Clock>,
    /// 通知テキストに使うエンティティ名
    entity: String,
}

impl IngestChangeUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        metrics: Arc<MetricsRegistry>,
        clock: Arc<dyn Clock>,
        entity: String,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            metrics,
            clock,
            entity,
        }
    }

    /// 取り込みを実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChangeNotice)` - ブロードキャストした通知
    /// * `Err(CdcError)` - 未知の操作種別（何も送信しない）
    pub async fn execute(&self, envelope: &ChangeEnvelope) -> Result<ChangeNotice, CdcError> {
        let notice = format_change(&self.entity, envelope)?;
        let now = self.clock.now_millis();

        let targets = self
            .repository
            .get_participants()
            .await
            .iter()
            .map(|p| p.key().to_string())
            .collect();

        self.metrics.record_change(now, notice.operation).await;
        let delivered = broadcast_and_record(
            self.message_pusher.as_ref(),
            &self.metrics,
            targets,
            &notice.text,
            now,
        )
        .await;
        tracing::info!("Broadcasted CDC event to {} clients: {}", delivered, notice.text);

        Ok(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cdc::{DEFAULT_ENTITY, Operation},
        domain::{MockMessagePusher, Participant},
        infrastructure::InMemoryParticipantRepository,
    };
    use cdc_feed_shared::{nickname::validate, time::FixedClock};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    async fn create_usecase(
        message_pusher: MockMessagePusher,
        metrics: Arc<MetricsRegistry>,
    ) -> IngestChangeUseCase {
        let repository = Arc::new(InMemoryParticipantRepository::new());
        for nickname in ["Oracle", "Nightwing"] {
            repository
                .add_participant(Participant::new(
                    "1".to_string(),
                    validate(nickname).unwrap(),
                    NOW,
                ))
                .await
                .unwrap();
        }
        IngestChangeUseCase::new(
            repository,
            Arc::new(message_pusher),
            metrics,
            Arc::new(FixedClock::new(NOW)),
            DEFAULT_ENTITY.to_string(),
        )
    }

    #[tokio::test]
    async fn test_ingest_broadcasts_to_everyone() {
        // テスト項目: CDC イベントが整形されて全員にブロードキャストされる
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .withf(|targets, content| {
                targets.len() == 2 && content == r#"SuperHero [Created]: {"id":7}"#
            })
            .times(1)
            .return_const(2usize);
        let metrics = Arc::new(MetricsRegistry::new(NOW));
        let usecase = create_usecase(message_pusher, metrics.clone()).await;
        let envelope = serde_json::from_value(json!({
            "payload": {"op": "c", "after": {"id": 7}}
        }))
        .unwrap();

        // when (操作):
        let notice = usecase.execute(&envelope).await.unwrap();

        // then (期待する結果):
        assert_eq!(notice.operation, Operation::Create);
        let rates = metrics.rates(NOW).await;
        assert_eq!(rates.cdc_events.create, 1);
        assert_eq!(rates.events24h.create, 1);
        assert!(rates.bytes_per_sec > 0.0);
    }

    #[tokio::test]
    async fn test_ingest_unknown_operation_sends_nothing() {
        // テスト項目: 未知の操作種別はエラーになり何も送信されない
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher.expect_broadcast().times(0);
        let metrics = Arc::new(MetricsRegistry::new(NOW));
        let usecase = create_usecase(message_pusher, metrics.clone()).await;
        let envelope = serde_json::from_value(json!({"payload": {"op": "x"}})).unwrap();

        // when (操作):
        let result = usecase.execute(&envelope).await;

        // then (期待する結果):
        assert_eq!(result, Err(CdcError::UnknownOperation("x".to_string())));
        assert_eq!(metrics.rates(NOW).await.total_messages, 0);
    }
}
