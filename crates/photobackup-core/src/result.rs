//! Convenience result type alias for PhotoBackup.

use crate::error::AppError;

/// A specialized `Result` type for PhotoBackup operations.
pub type AppResult<T> = Result<T, AppError>;
