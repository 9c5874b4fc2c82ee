//! Convenience result type alias for Deskbook.

use crate::error::AppError;

/// A specialized `Result` type for Deskbook operations.
pub type AppResult<T> = Result<T, AppError>;
