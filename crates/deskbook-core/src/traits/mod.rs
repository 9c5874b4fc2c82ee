//! Core traits defined in `deskbook-core` and implemented by other crates.

pub mod seat_catalog;

pub use seat_catalog::SeatCatalog;
