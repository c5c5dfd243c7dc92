//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMetricsUseCase,
    IngestChangeUseCase, SendMessageUseCase,
};

/// State handed to every handler
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// IngestChangeUseCase（CDC イベント取り込みのユースケース）
    pub ingest_change_usecase: Arc<IngestChangeUseCase>,
    /// GetMetricsUseCase（メトリクス取得のユースケース）
    pub get_metrics_usecase: Arc<GetMetricsUseCase>,
}
