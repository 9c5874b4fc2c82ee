//! Seat lock handlers.

use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use deskbook_core::error::AppError;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

use crate::dto::request::{LockRequest, validated};
use crate::dto::response::{ApiResponse, LockStatusResponse};
use crate::error::ApiError;
use crate::extractors::{ApiPath, Requester};
use crate::state::AppState;

/// Parse the optional JSON body of acquire/renew.
fn lock_ttl(body: &Bytes) -> Result<Option<Duration>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let req: LockRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_argument(format!("Invalid lock request body: {e}")))?;
    Ok(validated(req)?.ttl_seconds.map(Duration::from_secs))
}

/// POST /api/locks/seats/{seat_id}
pub async fn acquire_lock(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(seat_id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<SeatLock>>, ApiError> {
    let lock = state
        .locks
        .acquire(SeatId::from_uuid(seat_id), requester.user_id, lock_ttl(&body)?)
        .await?;
    Ok(Json(ApiResponse::ok(lock)))
}

/// PUT /api/locks/seats/{seat_id}
pub async fn renew_lock(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(seat_id): ApiPath<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<SeatLock>>, ApiError> {
    let lock = state
        .locks
        .renew(SeatId::from_uuid(seat_id), requester.user_id, lock_ttl(&body)?)
        .await?;
    Ok(Json(ApiResponse::ok(lock)))
}

/// DELETE /api/locks/seats/{seat_id}
pub async fn release_lock(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(seat_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .locks
        .release(SeatId::from_uuid(seat_id), requester.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/locks/seats/{seat_id}
pub async fn seat_lock_status(
    State(state): State<AppState>,
    ApiPath(seat_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<LockStatusResponse>>, ApiError> {
    let lock = state.locks.status_by_seat(SeatId::from_uuid(seat_id)).await?;
    Ok(Json(ApiResponse::ok(lock.into())))
}

/// GET /api/locks/users/{user_id}
pub async fn user_lock_status(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<LockStatusResponse>>, ApiError> {
    let lock = state.locks.status_by_user(UserId::from_uuid(user_id)).await?;
    Ok(Json(ApiResponse::ok(lock.into())))
}
