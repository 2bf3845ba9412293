use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the upload directory exists or can be created.
    pub uploads_ready: bool,
}

/// Liveness probe payload for `/test`.
#[derive(Serialize)]
pub struct PingResponse {
    pub message: &'static str,
    pub timestamp: restyle_core::types::Timestamp,
}

/// GET /health -- returns service and storage health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uploads_ready = state.assets.health_check().await;

    let status = if uploads_ready { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uploads_ready,
    })
}

/// GET /test -- confirms the server is answering.
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "Server is working!",
        timestamp: chrono::Utc::now(),
    })
}

/// Mount health check routes (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/test", get(ping))
}
