//! HTTP request handlers.

pub mod health;
pub mod locks;
pub mod reservations;
