//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 1xxx: Tenant errors
/// - 2xxx: Maintenance errors
/// - 3xxx: Inventory errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Tenant errors (1xxx)
    Tenant,
    /// Maintenance errors (2xxx)
    Maintenance,
    /// Inventory errors (3xxx)
    Inventory,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Tenant,
            2000..3000 => Self::Maintenance,
            3000..4000 => Self::Inventory,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Tenant => "tenant",
            Self::Maintenance => "maintenance",
            Self::Inventory => "inventory",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Tenant);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Maintenance);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Inventory);
        assert_eq!(ErrorCategory::from_code(5000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TenantNotFound.category(), ErrorCategory::Tenant);
        assert_eq!(
            ErrorCode::MaintenanceClosed.category(),
            ErrorCategory::Maintenance
        );
        assert_eq!(
            ErrorCode::InventoryItemNotFound.category(),
            ErrorCategory::Inventory
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(ErrorCategory::Maintenance.name(), "maintenance");
        assert_eq!(ErrorCategory::System.name(), "system");
    }
}
