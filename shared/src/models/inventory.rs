//! Inventory item enumerations

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryCategory {
    #[default]
    Furniture,
    Appliances,
    Utensils,
}

impl InventoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Appliances => "appliances",
            Self::Utensils => "utensils",
        }
    }
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    Damaged,
}

impl Condition {
    /// Numeric score used for averaging (excellent = 5 .. damaged = 1)
    pub fn score(&self) -> u8 {
        match self {
            Self::Excellent => 5,
            Self::Good => 4,
            Self::Fair => 3,
            Self::Poor => 2,
            Self::Damaged => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
    Retired,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in-use",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }
}
