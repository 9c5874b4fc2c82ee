//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let lock_store = state.locks.health_check().await.unwrap_or(false);
    let reservation_store = state.store.health_check().await.unwrap_or(false);

    let status = if lock_store && reservation_store {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        lock_store,
        reservation_store,
    }))
}
