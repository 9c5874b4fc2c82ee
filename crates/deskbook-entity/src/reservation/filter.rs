//! Reservation list filter.

use serde::{Deserialize, Serialize};

use deskbook_core::types::time_range::{self, TimeRange};
use deskbook_core::types::{SeatId, UserId};

use super::model::Reservation;

/// Conjunctive filter for reservation listings. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFilter {
    /// Only reservations of this client.
    pub client_id: Option<UserId>,
    /// Only reservations of this seat.
    pub seat_id: Option<SeatId>,
    /// Only reservations overlapping this interval.
    pub range: Option<TimeRange>,
    /// Only reservations with this attendance flag.
    pub visited: Option<bool>,
    /// Only reservations with this cancellation flag.
    pub canceled: Option<bool>,
}

impl ReservationFilter {
    /// Filter by client.
    pub fn by_client(client_id: UserId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::default()
        }
    }

    /// Filter by seat.
    pub fn by_seat(seat_id: SeatId) -> Self {
        Self {
            seat_id: Some(seat_id),
            ..Self::default()
        }
    }

    /// Filter by overlapping interval.
    pub fn by_range(range: TimeRange) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }

    /// Restrict to the given attendance flag.
    pub fn visited(mut self, visited: bool) -> Self {
        self.visited = Some(visited);
        self
    }

    /// Whether `reservation` satisfies every set criterion.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.client_id.is_none_or(|id| reservation.client_id == id)
            && self.seat_id.is_none_or(|id| reservation.seat_id == id)
            && self.range.is_none_or(|r| {
                time_range::overlaps(reservation.starts_at, reservation.ends_at, r.start(), r.end())
            })
            && self.visited.is_none_or(|v| reservation.is_visited == v)
            && self.canceled.is_none_or(|c| reservation.is_canceled == c)
    }
}
