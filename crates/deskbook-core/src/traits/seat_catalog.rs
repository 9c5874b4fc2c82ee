//! Seat catalog collaborator trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::SeatId;

/// Lookup into the external coworking catalog that owns seat metadata.
///
/// Implementations return `Ok(false)` only when the catalog explicitly
/// reports that the seat does not exist. Transport failures, timeouts and
/// unexpected responses must surface as `ErrorKind::Internal` so callers
/// never confuse an unreachable catalog with a missing seat.
#[async_trait]
pub trait SeatCatalog: Send + Sync + std::fmt::Debug {
    /// Whether the seat exists in the catalog.
    async fn seat_exists(&self, seat_id: SeatId) -> AppResult<bool>;
}
