//! Convenience result type alias for Tidings.

use crate::error::AppError;

/// A specialized `Result` type for Tidings operations.
pub type AppResult<T> = Result<T, AppError>;
