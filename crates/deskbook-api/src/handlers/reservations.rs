//! Reservation handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use deskbook_core::types::{ReservationId, SeatId, UserId};
use deskbook_entity::reservation::Reservation;
use deskbook_service::CreateReservationRequest;

use crate::dto::request::{
    CreateReservationBody, ListReservationsQuery, UpdateReservationBody, VisitedQuery, validated,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ApiJson, ApiPath, ApiQuery, Requester};
use crate::state::AppState;

/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiJson(body): ApiJson<CreateReservationBody>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), ApiError> {
    let body = validated(body)?;
    let req = CreateReservationRequest {
        client_id: body
            .client_id
            .map(UserId::from_uuid)
            .unwrap_or(requester.user_id),
        seat_id: SeatId::from_uuid(body.seat_id),
        starts_at: body.starts_at,
        ends_at: body.ends_at,
    };

    let reservation = state.reservations.create(&requester, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(reservation))))
}

/// GET /api/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .reservations
        .get_by_id(&requester, ReservationId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// PATCH /api/reservations/{id}
pub async fn update_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateReservationBody>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let patch = validated(body)?.into_patch();
    let reservation = state
        .reservations
        .update(&requester, ReservationId::from_uuid(id), patch)
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// POST /api/reservations/{id}/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .reservations
        .cancel(&requester, ReservationId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// POST /api/reservations/{id}/visit
pub async fn visit_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .reservations
        .visit(&requester, ReservationId::from_uuid(id))
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// DELETE /api/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    requester: Requester,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .reservations
        .delete(&requester, ReservationId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListReservationsQuery>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, ApiError> {
    let query = validated(query)?;
    let reservations = state
        .reservations
        .list(&query.filter()?, query.page())
        .await?;
    Ok(Json(ApiResponse::ok(reservations)))
}

/// GET /api/reservations/visited
pub async fn visited_reservations(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VisitedQuery>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, ApiError> {
    let query = validated(query)?;
    let reservations = state
        .reservations
        .get_visited_by_date(query.date(), query.page())
        .await?;
    Ok(Json(ApiResponse::ok(reservations)))
}
