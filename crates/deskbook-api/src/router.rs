//! Route definitions for the Deskbook HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with every route bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(lock_routes())
        .merge(reservation_routes())
        .route("/health", get(handlers::health::health));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Seat lock acquire, renew, release and status
fn lock_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/locks/seats/{seat_id}",
            post(handlers::locks::acquire_lock)
                .put(handlers::locks::renew_lock)
                .delete(handlers::locks::release_lock)
                .get(handlers::locks::seat_lock_status),
        )
        .route(
            "/locks/users/{user_id}",
            get(handlers::locks::user_lock_status),
        )
}

/// Reservation CRUD, state transitions and queries
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            get(handlers::reservations::list_reservations)
                .post(handlers::reservations::create_reservation),
        )
        .route(
            "/reservations/visited",
            get(handlers::reservations::visited_reservations),
        )
        .route(
            "/reservations/{id}",
            get(handlers::reservations::get_reservation)
                .patch(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/reservations/{id}/cancel",
            post(handlers::reservations::cancel_reservation),
        )
        .route(
            "/reservations/{id}/visit",
            post(handlers::reservations::visit_reservation),
        )
}
