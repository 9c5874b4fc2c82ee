//! # deskbook-lock
//!
//! Short-lived seat locks that guard the window between a user picking a
//! seat and confirming the reservation.
//!
//! Locks are bidirectional: a seat maps to its holder and the holder maps
//! back to the seat. Both directions are written in one atomic step using
//! either:
//! - Redis Lua scripts (for multi-node deployments)
//! - An in-memory Tokio mutex (for single-node deployments and tests)

pub mod dispatch;
pub mod keys;
pub mod manager;
pub mod memory;
#[cfg(feature = "redis-lock")]
pub mod redis;
pub mod store;

pub use dispatch::SeatLockStoreDispatch;
pub use keys::LockKeys;
pub use manager::LockManager;
pub use memory::MemorySeatLockStore;
pub use store::SeatLockStore;
