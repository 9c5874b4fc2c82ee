//! Seat lock manager.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use deskbook_core::config::LockConfig;
use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

use crate::store::SeatLockStore;

/// Issues, renews, releases and reports seat locks.
///
/// Resolves and bounds the TTL, then delegates the atomic work to the
/// configured [`SeatLockStore`].
#[derive(Debug, Clone)]
pub struct LockManager {
    store: Arc<dyn SeatLockStore>,
    default_ttl: Duration,
    max_ttl: Duration,
}

impl LockManager {
    /// Create a manager over `store` with TTL limits from `config`.
    pub fn new(store: Arc<dyn SeatLockStore>, config: &LockConfig) -> Self {
        Self {
            store,
            default_ttl: Duration::from_secs(config.default_ttl_seconds),
            max_ttl: Duration::from_secs(config.max_ttl_seconds),
        }
    }

    /// TTL applied when a caller does not choose one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn resolve_ttl(&self, requested: Option<Duration>) -> AppResult<Duration> {
        let ttl = requested.unwrap_or(self.default_ttl);
        if ttl.is_zero() {
            return Err(AppError::invalid_argument("lock TTL must be positive"));
        }
        if ttl > self.max_ttl {
            return Err(AppError::invalid_argument(format!(
                "lock TTL {}s exceeds the maximum of {}s",
                ttl.as_secs(),
                self.max_ttl.as_secs()
            )));
        }
        Ok(ttl)
    }

    /// Lock `seat_id` for `user_id`.
    pub async fn acquire(
        &self,
        seat_id: SeatId,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> AppResult<SeatLock> {
        let ttl = self.resolve_ttl(ttl)?;
        match self.store.acquire(seat_id, user_id, ttl).await {
            Ok(lock) => {
                info!(
                    seat_id = %seat_id,
                    user_id = %user_id,
                    expires_at = %lock.expires_at,
                    "Seat lock acquired"
                );
                Ok(lock)
            }
            Err(e) => {
                warn!(seat_id = %seat_id, user_id = %user_id, error = %e, "Seat lock denied");
                Err(e)
            }
        }
    }

    /// Extend the lock held by `user_id` on `seat_id`.
    pub async fn renew(
        &self,
        seat_id: SeatId,
        user_id: UserId,
        ttl: Option<Duration>,
    ) -> AppResult<SeatLock> {
        let ttl = self.resolve_ttl(ttl)?;
        let lock = self.store.renew(seat_id, user_id, ttl).await?;
        info!(
            seat_id = %seat_id,
            user_id = %user_id,
            expires_at = %lock.expires_at,
            "Seat lock renewed"
        );
        Ok(lock)
    }

    /// Release the lock held by `user_id` on `seat_id`.
    pub async fn release(&self, seat_id: SeatId, user_id: UserId) -> AppResult<()> {
        self.store.release(seat_id, user_id).await?;
        info!(seat_id = %seat_id, user_id = %user_id, "Seat lock released");
        Ok(())
    }

    /// The active lock on `seat_id`, if any.
    pub async fn status_by_seat(&self, seat_id: SeatId) -> AppResult<Option<SeatLock>> {
        self.store.by_seat(seat_id).await
    }

    /// The active lock held by `user_id`, if any.
    pub async fn status_by_user(&self, user_id: UserId) -> AppResult<Option<SeatLock>> {
        self.store.by_user(user_id).await
    }

    /// Whether `user_id` currently holds `seat_id`.
    pub async fn is_held_by(&self, seat_id: SeatId, user_id: UserId) -> AppResult<bool> {
        Ok(self
            .store
            .by_seat(seat_id)
            .await?
            .is_some_and(|lock| lock.is_held_by(user_id)))
    }

    /// Check the backend.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySeatLockStore;
    use deskbook_core::error::ErrorKind;

    fn manager() -> LockManager {
        let config = LockConfig {
            default_ttl_seconds: 300,
            max_ttl_seconds: 600,
            ..LockConfig::default()
        };
        LockManager::new(Arc::new(MemorySeatLockStore::new()), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_bounds() {
        let locks = manager();
        let seat = SeatId::new();

        let err = locks
            .acquire(seat, UserId::new(), Some(Duration::ZERO))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidArgument));

        let err = locks
            .acquire(seat, UserId::new(), Some(Duration::from_secs(601)))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidArgument));
        assert!(locks.status_by_seat(seat).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_ttl_applies() {
        let locks = manager();
        let (seat, user) = (SeatId::new(), UserId::new());
        locks.acquire(seat, user, None).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(locks.is_held_by(seat, user).await.unwrap());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!locks.is_held_by(seat, user).await.unwrap());
        assert!(locks.status_by_user(user).await.unwrap().is_none());
    }
}
