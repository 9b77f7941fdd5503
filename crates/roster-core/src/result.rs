//! Convenience result type alias for Roster.

use crate::error::AppError;

/// A specialized `Result` type for Roster operations.
pub type AppResult<T> = Result<T, AppError>;
