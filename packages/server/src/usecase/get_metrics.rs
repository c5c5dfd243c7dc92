//! UseCase: メトリクスの取得

use std::sync::Arc;

use cdc_feed_shared::{metrics::MetricsSnapshot, time::Clock};

use crate::{domain::ParticipantRepository, metrics::MetricsRegistry};

/// メトリクス取得のユースケース
pub struct GetMetricsUseCase {
    repository: Arc<dyn ParticipantRepository>,
    metrics: Arc<MetricsRegistry>,
    clock: Arc<dyn Clock>,
    topic_count: u64,
}

impl GetMetricsUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        metrics: Arc<MetricsRegistry>,
        clock: Arc<dyn Clock>,
        topic_count: u64,
    ) -> Self {
        Self {
            repository,
            metrics,
            clock,
            topic_count,
        }
    }

    /// 現時点のスナップショットを作成
    pub async fn execute(&self) -> MetricsSnapshot {
        let nicknames = self
            .repository
            .get_participants()
            .await
            .into_iter()
            .map(|p| p.nickname.into_string())
            .collect();

        self.metrics
            .rates(self.clock.now_millis())
            .await
            .into_snapshot(nicknames, self.topic_count)
    }
}
