//! Shared types for the Aurora property-management service
//!
//! Domain enums, lifecycle rules, the unified error system and the API
//! response envelope used by the server and its tests.

pub mod error;
pub mod lifecycle;
pub mod models;
pub mod money;
pub mod query;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use lifecycle::{calculate_status, rental_duration_days, total_rent};
pub use query::{PageQuery, Pagination, SortOrder};
