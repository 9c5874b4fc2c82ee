//! Partial update of a reservation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use deskbook_core::AppResult;
use deskbook_core::types::{SeatId, TimeRange, UserId};

use super::model::Reservation;

/// Partial-merge update: every `None` field leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPatch {
    /// Reassign the reservation to another client.
    #[serde(default)]
    pub client_id: Option<UserId>,
    /// Move the reservation to another seat.
    #[serde(default)]
    pub seat_id: Option<SeatId>,
    /// New start instant.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    /// New end instant.
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Cancel or reinstate.
    #[serde(default)]
    pub is_canceled: Option<bool>,
    /// Mark attendance.
    #[serde(default)]
    pub is_visited: Option<bool>,
}

impl ReservationPatch {
    /// A patch that only sets `is_canceled`.
    pub fn cancel() -> Self {
        Self {
            is_canceled: Some(true),
            ..Self::default()
        }
    }

    /// A patch that only sets `is_visited`.
    pub fn visit() -> Self {
        Self {
            is_visited: Some(true),
            ..Self::default()
        }
    }

    /// Whether the patch touches the seat or the interval.
    pub fn moves_booking(&self) -> bool {
        self.seat_id.is_some() || self.starts_at.is_some() || self.ends_at.is_some()
    }

    /// Merge the patch onto `current`, validating the resulting interval.
    pub fn apply(&self, current: &Reservation, now: DateTime<Utc>) -> AppResult<Reservation> {
        let starts_at = self.starts_at.unwrap_or(current.starts_at);
        let ends_at = self.ends_at.unwrap_or(current.ends_at);
        TimeRange::new(starts_at, ends_at)?;

        Ok(Reservation {
            id: current.id,
            client_id: self.client_id.unwrap_or(current.client_id),
            seat_id: self.seat_id.unwrap_or(current.seat_id),
            starts_at,
            ends_at,
            is_canceled: self.is_canceled.unwrap_or(current.is_canceled),
            is_visited: self.is_visited.unwrap_or(current.is_visited),
            created_at: current.created_at,
            updated_at: now,
        })
    }
}
