//! Backend selection for the seat lock store.

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use deskbook_core::config::{LockBackend, LockConfig};
use deskbook_core::error::AppError;
use deskbook_core::result::AppResult;
use deskbook_core::types::{SeatId, UserId};
use deskbook_entity::lock::SeatLock;

use crate::memory::MemorySeatLockStore;
#[cfg(feature = "redis-lock")]
use crate::redis::RedisSeatLockStore;
use crate::store::SeatLockStore;

/// Dispatcher for seat lock backends.
///
/// Switches between in-memory and Redis-based storage based on configuration.
#[derive(Debug, Clone)]
pub enum SeatLockStoreDispatch {
    /// In-memory store (single node).
    Memory(MemorySeatLockStore),
    /// Redis-based store (multi-node).
    #[cfg(feature = "redis-lock")]
    Redis(RedisSeatLockStore),
}

impl SeatLockStoreDispatch {
    /// Build the backend named by `config.backend`.
    pub async fn from_config(config: &LockConfig) -> AppResult<Self> {
        match config.backend {
            LockBackend::Memory => {
                info!("Using in-memory seat lock store");
                Ok(Self::Memory(MemorySeatLockStore::new()))
            }
            #[cfg(feature = "redis-lock")]
            LockBackend::Redis => {
                let store = RedisSeatLockStore::connect(&config.redis_url, &config.key_prefix).await?;
                Ok(Self::Redis(store))
            }
            #[cfg(not(feature = "redis-lock"))]
            LockBackend::Redis => Err(AppError::configuration(
                "lock.backend = \"redis\" requires the redis-lock feature",
            )),
        }
    }
}

#[async_trait]
impl SeatLockStore for SeatLockStoreDispatch {
    async fn acquire(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> Result<SeatLock, AppError> {
        match self {
            Self::Memory(inner) => inner.acquire(seat_id, user_id, ttl).await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.acquire(seat_id, user_id, ttl).await,
        }
    }

    async fn renew(&self, seat_id: SeatId, user_id: UserId, ttl: Duration) -> Result<SeatLock, AppError> {
        match self {
            Self::Memory(inner) => inner.renew(seat_id, user_id, ttl).await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.renew(seat_id, user_id, ttl).await,
        }
    }

    async fn release(&self, seat_id: SeatId, user_id: UserId) -> Result<(), AppError> {
        match self {
            Self::Memory(inner) => inner.release(seat_id, user_id).await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.release(seat_id, user_id).await,
        }
    }

    async fn by_seat(&self, seat_id: SeatId) -> Result<Option<SeatLock>, AppError> {
        match self {
            Self::Memory(inner) => inner.by_seat(seat_id).await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.by_seat(seat_id).await,
        }
    }

    async fn by_user(&self, user_id: UserId) -> Result<Option<SeatLock>, AppError> {
        match self {
            Self::Memory(inner) => inner.by_user(user_id).await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.by_user(user_id).await,
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::Memory(inner) => inner.health_check().await,
            #[cfg(feature = "redis-lock")]
            Self::Redis(inner) => inner.health_check().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_from_default_config() {
        let store = SeatLockStoreDispatch::from_config(&LockConfig::default())
            .await
            .unwrap();
        assert!(matches!(store, SeatLockStoreDispatch::Memory(_)));
        assert!(store.health_check().await.unwrap());
    }
}
