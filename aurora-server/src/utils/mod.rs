//! Utilities: logging, validation and rate limiting

pub mod logger;
pub mod rate_limit;
pub mod validation;

pub use shared::{ApiResponse, AppError, AppResult};
