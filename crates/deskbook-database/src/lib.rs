//! # deskbook-database
//!
//! PostgreSQL connection management, migrations, and the reservation store.
//! The store is a trait with a PostgreSQL implementation for production and
//! an in-memory implementation for tests and single-node development.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryReservationStore;
pub use repositories::PgReservationRepository;
pub use store::ReservationStore;
