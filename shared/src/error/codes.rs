//! Unified error codes for the Aurora service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Tenant errors
//! - 2xxx: Maintenance errors
//! - 3xxx: Inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Route does not exist
    RouteNotFound = 9,
    /// Too many requests from one client
    TooManyRequests = 10,

    // ==================== 1xxx: Tenant ====================
    /// Tenant not found
    TenantNotFound = 1001,
    /// Check-out date precedes check-in date
    TenantInvalidStay = 1002,

    // ==================== 2xxx: Maintenance ====================
    /// Maintenance request not found
    MaintenanceNotFound = 2001,
    /// Maintenance request is already closed
    MaintenanceClosed = 2002,

    // ==================== 3xxx: Inventory ====================
    /// Inventory item not found
    InventoryItemNotFound = 3001,
    /// Inventory item is retired
    InventoryItemRetired = 3002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation error",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::RouteNotFound => "Route not found",
            ErrorCode::TooManyRequests => {
                "Too many requests from this IP, please try again later."
            }

            // Tenant
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::TenantInvalidStay => "Check-out date cannot precede check-in date",

            // Maintenance
            ErrorCode::MaintenanceNotFound => "Maintenance request not found",
            ErrorCode::MaintenanceClosed => "Maintenance request is already closed",

            // Inventory
            ErrorCode::InventoryItemNotFound => "Inventory item not found",
            ErrorCode::InventoryItemRetired => "Inventory item is retired",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::RouteNotFound),
            10 => Ok(ErrorCode::TooManyRequests),

            // Tenant
            1001 => Ok(ErrorCode::TenantNotFound),
            1002 => Ok(ErrorCode::TenantInvalidStay),

            // Maintenance
            2001 => Ok(ErrorCode::MaintenanceNotFound),
            2002 => Ok(ErrorCode::MaintenanceClosed),

            // Inventory
            3001 => Ok(ErrorCode::InventoryItemNotFound),
            3002 => Ok(ErrorCode::InventoryItemRetired),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::TooManyRequests.code(), 10);

        assert_eq!(ErrorCode::TenantNotFound.code(), 1001);
        assert_eq!(ErrorCode::MaintenanceNotFound.code(), 2001);
        assert_eq!(ErrorCode::InventoryItemNotFound.code(), 3001);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::TenantNotFound));
        assert_eq!(ErrorCode::try_from(2002), Ok(ErrorCode::MaintenanceClosed));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(
            InvalidErrorCode(4242).to_string(),
            "invalid error code: 4242"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TenantNotFound).unwrap();
        assert_eq!(json, "1001");

        let code: ErrorCode = serde_json::from_str("3001").unwrap();
        assert_eq!(code, ErrorCode::InventoryItemNotFound);

        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::TenantNotFound.message(), "Tenant not found");
        assert_eq!(
            ErrorCode::MaintenanceNotFound.message(),
            "Maintenance request not found"
        );
        assert_eq!(ErrorCode::ValidationFailed.message(), "Validation error");
    }
}
