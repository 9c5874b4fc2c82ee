//! Lock key builders.
//!
//! Every key the Redis backend touches is built here.

use deskbook_core::types::{SeatId, UserId};

/// Builds the seat and user keys under a configurable prefix.
#[derive(Debug, Clone)]
pub struct LockKeys {
    seat_prefix: String,
    user_prefix: String,
}

impl LockKeys {
    /// Create key builders under `prefix` (e.g. `deskbook`).
    pub fn new(prefix: &str) -> Self {
        Self {
            seat_prefix: format!("{prefix}:lock:seat:"),
            user_prefix: format!("{prefix}:lock:user:"),
        }
    }

    /// Key mapping a seat to its holder.
    pub fn seat(&self, seat_id: SeatId) -> String {
        format!("{}{seat_id}", self.seat_prefix)
    }

    /// Key mapping a user to the seat they hold.
    pub fn user(&self, user_id: UserId) -> String {
        format!("{}{user_id}", self.user_prefix)
    }

    /// Common prefix of all seat keys.
    pub fn seat_prefix(&self) -> &str {
        &self.seat_prefix
    }

    /// Common prefix of all user keys.
    pub fn user_prefix(&self) -> &str {
        &self.user_prefix
    }
}

impl Default for LockKeys {
    fn default() -> Self {
        Self::new("deskbook")
    }
}
