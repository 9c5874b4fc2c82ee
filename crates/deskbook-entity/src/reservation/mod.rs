//! Reservation entity, write models, and query filter.

pub mod filter;
pub mod model;
pub mod patch;

pub use filter::ReservationFilter;
pub use model::{NewReservation, Reservation};
pub use patch::ReservationPatch;
