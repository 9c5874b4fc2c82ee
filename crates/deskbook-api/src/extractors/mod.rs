//! Custom Axum extractors.

pub mod rejection;
pub mod requester;

pub use rejection::{ApiJson, ApiPath, ApiQuery};
pub use requester::{Requester, USER_ID_HEADER, USER_ROLE_HEADER};
