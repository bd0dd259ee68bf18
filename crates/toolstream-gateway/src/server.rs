use crate::chat::chat_handler;
use crate::middleware::request_log_middleware;
use axum::{
    middleware as axum_mw,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use toolstream_agent::Bridge;
use toolstream_builtins::SimilaritySearchTool;

/// Shared application state.
pub struct AppState {
    pub bridge: Arc<Bridge>,
    /// Backs `rag: true` chat requests; those are rejected when absent.
    pub retrieval: Option<Arc<SimilaritySearchTool>>,
}

/// The HTTP front door.
pub struct GatewayServer;

impl GatewayServer {
    pub fn build(bridge: Arc<Bridge>, retrieval: Option<Arc<SimilaritySearchTool>>) -> Router {
        let state = Arc::new(AppState { bridge, retrieval });

        Router::new()
            .route("/api/chat", post(chat_handler))
            .route("/health", get(health_handler))
            .layer(axum_mw::from_fn(request_log_middleware))
            .with_state(state)
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok", "service": "toolstream"}))
}
