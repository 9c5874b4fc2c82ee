//! Reservation coordination: booking policy and the coordinator service.

pub mod policy;
pub mod service;

pub use policy::BookingPolicy;
pub use service::{CreateReservationRequest, ReservationService};
