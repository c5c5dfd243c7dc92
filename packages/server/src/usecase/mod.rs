//! UseCase 層: バックエンドのアプリケーションロジック

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_metrics;
mod ingest_change;
mod send_message;

use crate::{domain::MessagePusher, metrics::MetricsRegistry};

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ConnectError;
pub use get_metrics::GetMetricsUseCase;
pub use ingest_change::IngestChangeUseCase;
pub use send_message::SendMessageUseCase;

/// Broadcast `content` and account the delivered bytes
async fn broadcast_and_record(
    message_pusher: &dyn MessagePusher,
    metrics: &MetricsRegistry,
    targets: Vec<String>,
    content: &str,
    at: i64,
) -> usize {
    let delivered = message_pusher.broadcast(targets, content).await;
    metrics
        .record_bytes(at, (delivered * content.len()) as u64)
        .await;
    delivered
}
