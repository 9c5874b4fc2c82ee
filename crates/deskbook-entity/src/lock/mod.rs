//! Seat lock value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use deskbook_core::types::{SeatId, UserId};

/// A short-term claim on a seat while a user finalizes a booking.
///
/// The same lock is reachable from the seat and from the user; a store only
/// ever hands out a `SeatLock` when both directions agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLock {
    /// The held seat.
    pub seat_id: SeatId,
    /// The holder.
    pub user_id: UserId,
    /// When the lock lapses unless renewed.
    pub expires_at: DateTime<Utc>,
}

impl SeatLock {
    /// Whether `user_id` is the holder.
    pub fn is_held_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
