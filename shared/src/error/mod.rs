//! Unified error system for the Aurora service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and field errors
//! - [`ApiResponse`]: Unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Tenant errors
//! - 2xxx: Maintenance errors
//! - 3xxx: Inventory errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::TenantNotFound);
//! assert_eq!(err.message, "Tenant not found");
//!
//! let err = AppError::validation_errors(vec![
//!     "Tenant name is required".to_string(),
//!     "Phone number is required".to_string(),
//! ]);
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
