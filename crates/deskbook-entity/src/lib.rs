//! # deskbook-entity
//!
//! Domain entity models for Deskbook. Every struct in this crate represents
//! a database table row or a domain value object. Database entities
//! additionally derive `sqlx::FromRow`.

pub mod lock;
pub mod reservation;
pub mod user;

pub use lock::SeatLock;
pub use reservation::{NewReservation, Reservation, ReservationFilter, ReservationPatch};
pub use user::UserRole;
