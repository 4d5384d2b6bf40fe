//! Convenience result type alias for RoomGate.

use crate::error::AppError;

/// A specialized `Result` type for RoomGate operations.
pub type AppResult<T> = Result<T, AppError>;
