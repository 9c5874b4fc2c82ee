//! # deskbook-core
//!
//! Core crate for Deskbook. Contains the unified error system, configuration
//! schemas, typed identifiers, pagination and time-range types, and the
//! collaborator traits implemented by other crates.
//!
//! This crate has **no** internal dependencies on other Deskbook crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
