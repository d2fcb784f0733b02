/// Logging utilities
pub mod logging;

/// Global error handling
pub mod error;

pub use error::{AppError, AppResult, ErrorCode, ErrorContext};
