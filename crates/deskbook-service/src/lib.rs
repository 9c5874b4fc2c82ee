//! # deskbook-service
//!
//! Business logic service layer for Deskbook. The reservation coordinator
//! ties the seat lock manager, the seat catalog, the availability checker
//! and the reservation store together behind authorization and booking
//! policy checks.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod availability;
pub mod catalog;
pub mod context;
pub mod reservation;

pub use availability::AvailabilityChecker;
pub use catalog::{HttpSeatCatalog, StaticSeatCatalog};
pub use context::RequestContext;
pub use reservation::{BookingPolicy, CreateReservationRequest, ReservationService};
