//! Tenant enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status, derived from check-in/check-out dates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TenantStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How rent is charged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RentalBasis {
    #[default]
    Monthly,
    Daily,
}

/// Channel the booking came through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingSource {
    Online,
    InPerson,
    Call,
    TravelAgent,
    Other,
}

/// Identity document check state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdVerification {
    Verified,
    #[default]
    Pending,
    NotVerified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&BookingSource::InPerson).unwrap(),
            "\"in-person\""
        );
        assert_eq!(
            serde_json::to_string(&IdVerification::NotVerified).unwrap(),
            "\"not-verified\""
        );
        assert_eq!(TenantStatus::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RentalBasis::default(), RentalBasis::Monthly);
        assert_eq!(IdVerification::default(), IdVerification::Pending);
    }
}
