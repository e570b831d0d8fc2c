//! Convenience result type alias for the uploader.

use crate::error::AppError;

/// A specialized `Result` type for uploader operations.
pub type AppResult<T> = Result<T, AppError>;
