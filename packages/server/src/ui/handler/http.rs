//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use cdc_feed_shared::metrics::MetricsSnapshot;

use crate::{cdc::ChangeEnvelope, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Current metrics document
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.get_metrics_usecase.execute().await)
}

/// Debezium change envelope ingest
///
/// Answers 202 with the broadcast line, or 422 for an unknown operation.
pub async fn ingest_cdc(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<ChangeEnvelope>,
) -> (StatusCode, Json<Value>) {
    match state.ingest_change_usecase.execute(&envelope).await {
        Ok(notice) => (
            StatusCode::ACCEPTED,
            Json(json!({"status": "accepted", "message": notice.text})),
        ),
        Err(e) => {
            tracing::warn!("Rejected CDC event: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"status": "rejected", "error": e.to_string()})),
            )
        }
    }
}
