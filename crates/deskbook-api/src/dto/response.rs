//! Response DTOs.

use serde::{Deserialize, Serialize};

use deskbook_entity::lock::SeatLock;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Lock status for a seat or a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockStatusResponse {
    /// Whether an active lock exists.
    pub held: bool,
    /// The lock, when held.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock: Option<SeatLock>,
}

impl From<Option<SeatLock>> for LockStatusResponse {
    fn from(lock: Option<SeatLock>) -> Self {
        Self {
            held: lock.is_some(),
            lock,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every backend answered, `degraded` otherwise.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Lock store reachable.
    pub lock_store: bool,
    /// Reservation store reachable.
    pub reservation_store: bool,
}
