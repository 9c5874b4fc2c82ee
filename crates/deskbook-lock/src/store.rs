//! Seat lock store trait.

use std::time::Duration;

use async_trait::async_trait;

use deskbook_core::result::AppResult;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

/// Atomic storage for bidirectional seat locks.
///
/// Implementations must be thread-safe. A lock whose two directions
/// disagree, or whose TTL has elapsed, reads as absent.
#[async_trait]
pub trait SeatLockStore: Send + Sync + std::fmt::Debug {
    /// Take the seat for `user_id`, or refresh the TTL if they already hold it.
    ///
    /// Fails with `Conflict` when another user holds the seat or the user
    /// holds a different seat.
    async fn acquire(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock>;

    /// Extend the holder's lock. `NotOwner` when `user_id` is not the holder.
    async fn renew(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> AppResult<SeatLock>;

    /// Drop both directions of the lock.
    ///
    /// Succeeds when no lock exists. `NotOwner` when another user holds it.
    async fn release(&self, seat_id: SeatId, user_id: UserId) -> AppResult<()>;

    /// The active lock on a seat, if any.
    async fn by_seat(&self, seat_id: SeatId) -> AppResult<Option<SeatLock>>;

    /// The active lock held by a user, if any.
    async fn by_user(&self, user_id: UserId) -> AppResult<Option<SeatLock>>;

    /// Check connectivity to the backing store.
    async fn health_check(&self) -> AppResult<bool>;
}
