//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.store.health_check().await {
        Ok(true) => "connected",
        Ok(false) | Err(_) => "unavailable",
    };
    let storage = match state.storage.health_check().await {
        Ok(true) => "available",
        Ok(false) | Err(_) => "unavailable",
    };
    let status = if database == "connected" && storage == "available" {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: database.to_string(),
        storage: storage.to_string(),
        storage_provider: state.storage.provider_type().to_string(),
        active_sessions: state.sessions.len(),
    })
}
