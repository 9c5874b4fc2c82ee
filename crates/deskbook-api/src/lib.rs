//! # deskbook-api
//!
//! HTTP API layer for Deskbook built on Axum.
//!
//! Provides the seat lock and reservation endpoints, the requester
//! extractor reading gateway headers, request/response DTOs, CORS setup,
//! and the mapping from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
