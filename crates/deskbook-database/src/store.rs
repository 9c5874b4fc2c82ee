//! Reservation store abstraction.

use async_trait::async_trait;

use deskbook_core::result::AppResult;
use deskbook_core::types::{PageRequest, ReservationId, SeatId, TimeRange, UserId};
use deskbook_entity::reservation::{NewReservation, Reservation, ReservationFilter, ReservationPatch};

/// Durable record of reservations.
///
/// The `*_checked` writes perform their overlap test and the write as one
/// atomic step, so two concurrent callers can never both persist
/// overlapping active reservations of the same seat. The loser gets
/// `ErrorKind::Conflict`.
///
/// Writes taking `required_owner` fail with `ErrorKind::PermissionDenied`
/// when the stored reservation belongs to someone else; the ownership test
/// runs against the same snapshot that is written.
#[async_trait]
pub trait ReservationStore: Send + Sync + std::fmt::Debug {
    /// Insert a reservation unless it overlaps an active one on the same seat.
    async fn insert_checked(&self, new: NewReservation) -> AppResult<Reservation>;

    /// Merge `patch` into the stored reservation.
    ///
    /// When the merged reservation is active, its interval is re-checked
    /// against every other active reservation of its (possibly new) seat.
    async fn update_checked(
        &self,
        id: ReservationId,
        patch: &ReservationPatch,
        required_owner: Option<UserId>,
    ) -> AppResult<Reservation>;

    /// Remove a reservation permanently.
    async fn delete(&self, id: ReservationId, required_owner: Option<UserId>) -> AppResult<()>;

    /// Load a reservation by identifier.
    async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<Reservation>>;

    /// Whether a reservation with this identifier exists.
    async fn exists(&self, id: ReservationId) -> AppResult<bool>;

    /// List reservations matching `filter`, ordered by start time.
    async fn list(&self, filter: &ReservationFilter, page: &PageRequest) -> AppResult<Vec<Reservation>>;

    /// Whether any active reservation of `seat_id` other than `exclude`
    /// overlaps `range`.
    async fn is_overlapping(
        &self,
        seat_id: SeatId,
        range: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> AppResult<bool>;

    /// Check connectivity to the backing store.
    async fn health_check(&self) -> AppResult<bool>;
}
