//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use cdc_feed_shared::{
    protocol::{CDC_INGEST_PATH, METRICS_PATH},
    time::Clock,
};

use crate::{
    cdc::{DEFAULT_ENTITY, DEFAULT_TOPIC},
    error::ServerError,
    infrastructure::{InMemoryParticipantRepository, WebSocketMessagePusher},
    metrics::MetricsRegistry,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMetricsUseCase,
        IngestChangeUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{get_metrics, health_check, ingest_cdc, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// What the backend reports about its change stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Label placed in front of every CDC line
    pub entity: String,
    /// Topics counted by the metrics document
    pub topics: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            entity: DEFAULT_ENTITY.to_string(),
            topics: vec![DEFAULT_TOPIC.to_string()],
        }
    }
}

/// Wire repository, pusher, metrics and use cases together
///
/// Dependencies are created in order: Repository, MessagePusher, MetricsRegistry,
/// then the use cases sharing them.
pub fn build_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<AppState> {
    let repository = Arc::new(InMemoryParticipantRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());
    let metrics = Arc::new(MetricsRegistry::new(clock.now_millis()));

    Arc::new(AppState {
        connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            metrics.clone(),
            clock.clone(),
        )),
        disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            metrics.clone(),
            clock.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            metrics.clone(),
            clock.clone(),
        )),
        ingest_change_usecase: Arc::new(IngestChangeUseCase::new(
            repository.clone(),
            message_pusher,
            metrics.clone(),
            clock.clone(),
            config.entity.clone(),
        )),
        get_metrics_usecase: Arc::new(GetMetricsUseCase::new(
            repository,
            metrics,
            clock,
            config.topics.len() as u64,
        )),
    })
}

/// Routes of the backend
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws/{client_id}", get(websocket_handler))
        // HTTP エンドポイント
        .route(CDC_INGEST_PATH, post(ingest_cdc))
        .route(METRICS_PATH, get(get_metrics))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CDC feed development server
///
/// # Example
///
/// ```ignore
/// let state = build_state(&ServerConfig::default(), Arc::new(SystemClock));
/// Server::new(state).run("127.0.0.1".to_string(), 8000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Bind to `host:port` and serve until Ctrl+C
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("CDC feed server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/{{client_id}}?nickname=...", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
