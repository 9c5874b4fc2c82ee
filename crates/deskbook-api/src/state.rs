//! Application state shared across all handlers.

use std::sync::Arc;

use deskbook_database::store::ReservationStore;
use deskbook_lock::LockManager;
use deskbook_service::ReservationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Seat lock manager.
    pub locks: Arc<LockManager>,
    /// Reservation coordinator.
    pub reservations: Arc<ReservationService>,
    /// Reservation store, for health reporting.
    pub store: Arc<dyn ReservationStore>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(
        locks: Arc<LockManager>,
        reservations: Arc<ReservationService>,
        store: Arc<dyn ReservationStore>,
    ) -> Self {
        Self {
            locks,
            reservations,
            store,
        }
    }
}
