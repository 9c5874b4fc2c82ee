//! Core type definitions used across the Deskbook workspace.

pub mod id;
pub mod pagination;
pub mod time_range;

pub use id::*;
pub use pagination::PageRequest;
pub use time_range::{DateQuery, TimeRange};
