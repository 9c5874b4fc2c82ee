//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use deskbook_core::AppResult;
use deskbook_core::types::time_range::{self, TimeRange};
use deskbook_core::types::{ReservationId, SeatId, UserId};

/// A booking of one seat by one client over `[starts_at, ends_at)`.
///
/// Canceled reservations stay in the store for audit but never block
/// other bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: ReservationId,
    /// The client the seat is booked for.
    pub client_id: UserId,
    /// The booked seat.
    pub seat_id: SeatId,
    /// Inclusive start of the booking.
    pub starts_at: DateTime<Utc>,
    /// Exclusive end of the booking.
    pub ends_at: DateTime<Utc>,
    /// Whether the booking was canceled.
    pub is_canceled: bool,
    /// Whether the client showed up.
    pub is_visited: bool,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
    /// When the reservation was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// The booked interval.
    pub fn range(&self) -> AppResult<TimeRange> {
        TimeRange::new(self.starts_at, self.ends_at)
    }

    /// Whether this reservation still holds its seat.
    pub fn is_active(&self) -> bool {
        !self.is_canceled
    }

    /// Whether this reservation blocks `range` on `seat_id`.
    ///
    /// `exclude` lets a reservation be checked against every booking except
    /// itself when it is being moved.
    pub fn blocks(&self, seat_id: SeatId, range: &TimeRange, exclude: Option<ReservationId>) -> bool {
        self.is_active()
            && self.seat_id == seat_id
            && Some(self.id) != exclude
            && time_range::overlaps(self.starts_at, self.ends_at, range.start(), range.end())
    }
}

/// Data required to create a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    /// The client the seat is booked for.
    pub client_id: UserId,
    /// The seat to book.
    pub seat_id: SeatId,
    /// The interval to book.
    pub range: TimeRange,
}

impl NewReservation {
    /// Materialize the entity with a fresh identifier.
    pub fn into_reservation(self, now: DateTime<Utc>) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            client_id: self.client_id,
            seat_id: self.seat_id,
            starts_at: self.range.start(),
            ends_at: self.range.end(),
            is_canceled: false,
            is_visited: false,
            created_at: now,
            updated_at: now,
        }
    }
}
