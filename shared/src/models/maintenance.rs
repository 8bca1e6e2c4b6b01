//! Maintenance request enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceType {
    Plumbing,
    Electrical,
    Appliance,
    Structural,
    #[default]
    Other,
}

/// Request priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Sort rank, most pressing first (urgent = 0)
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Days an open request may age before it counts as overdue
    pub fn overdue_threshold_days(&self) -> i64 {
        match self {
            Self::Urgent => 1,
            Self::High => 3,
            Self::Medium => 7,
            Self::Low => 14,
        }
    }
}

/// Request workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Pending or in progress
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
