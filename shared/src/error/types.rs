//! Error types and API response structures

use super::codes::ErrorCode;
use crate::query::Pagination;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error with structured error code and messages
///
/// This is the primary error type of the service, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - A human-readable summary message
/// - An optional list of field-level messages (validation failures)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Individual messages, one per violated constraint
    pub errors: Vec<String>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            errors: Vec::new(),
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Append a field-level message
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error carrying a single message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed).with_error(msg)
    }

    /// Create a validation error from a list of messages
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            errors,
            ..Self::new(ErrorCode::ValidationFailed)
        }
    }

    /// Create a generic not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, format!("{} not found", resource.into()))
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a rate limited error
    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }

    /// Create a route not found error
    pub fn route_not_found() -> Self {
        Self::new(ErrorCode::RouteNotFound)
    }
}

/// Unified API response envelope
///
/// Every endpoint answers with the same shape:
/// - `success`: whether the operation succeeded
/// - `message`: human-readable summary
/// - `data`: response payload (on success)
/// - `errors`: individual failure messages (on validation failure)
/// - `pagination`: page metadata for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Error code (absent on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
            pagination: None,
            code: None,
        }
    }

    /// Create a success response with custom message and data
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    /// Create a success response for one page of a list
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(data)
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response carrying only a message
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            errors: None,
            pagination: None,
            code: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            success: false,
            message: Some(err.message.clone()),
            data: None,
            errors: (!err.errors.is_empty()).then(|| err.errors.clone()),
            pagination: None,
            code: Some(err.code.code()),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = match self.code {
            None => StatusCode::OK,
            Some(code) => ErrorCode::try_from(code)
                .map(|c| c.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };

        (status, Json(self)).into_response()
    }
}
