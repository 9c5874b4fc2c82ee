//! PostgreSQL-backed store implementations.

pub mod reservation;

pub use reservation::PgReservationRepository;
