//! Inventory Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::maintenance::Image;
use super::serde_helpers;
use crate::utils::validation::{self, item_count};
use shared::lifecycle;
use shared::models::{Condition, InventoryCategory, InventoryStatus};
use shared::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Dimensions {
    #[validate(range(min = 0.0, message = "Length cannot be negative"))]
    pub length: Option<f64>,
    #[validate(range(min = 0.0, message = "Width cannot be negative"))]
    pub width: Option<f64>,
    #[validate(range(min = 0.0, message = "Height cannot be negative"))]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Specifications {
    #[serde(default)]
    #[validate(nested)]
    pub dimensions: Dimensions,
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub material: String,
}

impl Specifications {
    fn normalize(&mut self) {
        self.color = self.color.trim().to_string();
        self.material = self.material.trim().to_string();
    }
}

/// Inventory item as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub apartment_number: String,
    #[serde(default)]
    pub category: InventoryCategory,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_price: f64,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub warranty_expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: InventoryStatus,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub last_maintenance: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub next_maintenance: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub specifications: Specifications,
    #[serde(with = "serde_helpers::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn age(&self, now: DateTime<Utc>) -> Option<i64> {
        lifecycle::age_days(self.purchase_date, now)
    }

    pub fn warranty_expired(&self, now: DateTime<Utc>) -> Option<bool> {
        lifecycle::warranty_expired(self.warranty_expiry, now)
    }

    pub fn maintenance_due(&self, now: DateTime<Utc>) -> bool {
        lifecycle::maintenance_due(self.next_maintenance, now)
    }

    /// Record maintenance done now and book the next one
    pub fn schedule_maintenance(
        &mut self,
        next: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.status == InventoryStatus::Retired {
            return Err(AppError::new(ErrorCode::InventoryItemRetired));
        }
        self.last_maintenance = Some(now);
        self.next_maintenance = Some(next);
        self.updated_at = now;
        Ok(())
    }

    pub fn set_status(&mut self, status: InventoryStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    pub fn set_condition(&mut self, condition: Condition, now: DateTime<Utc>) {
        self.condition = condition;
        self.updated_at = now;
    }
}

/// Item as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub age: Option<i64>,
    pub warranty_expired: Option<bool>,
    pub maintenance_due: bool,
}

impl InventoryView {
    pub fn new(item: InventoryItem, now: DateTime<Utc>) -> Self {
        Self {
            age: item.age(now),
            warranty_expired: item.warranty_expired(now),
            maintenance_due: item.maintenance_due(now),
            item,
        }
    }
}

/// Item creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCreate {
    #[validate(
        required(message = "Apartment number is required"),
        length(max = 20, message = "Apartment number cannot exceed 20 characters")
    )]
    pub apartment_number: Option<String>,
    #[validate(required(message = "Category is required"))]
    pub category: Option<InventoryCategory>,
    #[serde(rename = "type")]
    #[validate(
        required(message = "Item type is required"),
        length(max = 100, message = "Item type cannot exceed 100 characters")
    )]
    pub kind: Option<String>,
    #[validate(required(message = "Count is required"), custom(function = "item_count"))]
    pub count: Option<i64>,
    pub condition: Option<Condition>,
    #[validate(length(max = 100, message = "Brand cannot exceed 100 characters"))]
    pub brand: Option<String>,
    #[validate(length(max = 100, message = "Model cannot exceed 100 characters"))]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "Purchase price cannot be negative"))]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub warranty_expiry: Option<DateTime<Utc>>,
    #[validate(length(max = 200, message = "Location cannot exceed 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    pub status: Option<InventoryStatus>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub last_maintenance: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub next_maintenance: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<Image>,
    #[serde(default)]
    #[validate(nested)]
    pub specifications: Specifications,
}

impl InventoryCreate {
    pub fn normalize(&mut self) {
        validation::clean(&mut self.apartment_number);
        validation::clean(&mut self.kind);
        validation::clean(&mut self.brand);
        validation::clean(&mut self.model);
        validation::clean(&mut self.location);
        self.specifications.normalize();
    }

    pub fn check(&self) -> AppResult<()> {
        validation::validate_payload(self)
    }

    pub fn into_item(self, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id: None,
            apartment_number: self.apartment_number.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            count: self.count.unwrap_or(1),
            condition: self.condition.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            purchase_date: self.purchase_date,
            purchase_price: self.purchase_price.unwrap_or_default(),
            warranty_expiry: self.warranty_expiry,
            location: self.location.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            last_maintenance: self.last_maintenance,
            next_maintenance: self.next_maintenance,
            images: self.images,
            specifications: self.specifications,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Item update payload (all optional)
///
/// Nullable dates accept `null` to clear the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    #[validate(length(max = 20, message = "Apartment number cannot exceed 20 characters"))]
    pub apartment_number: Option<String>,
    pub category: Option<InventoryCategory>,
    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "Item type cannot exceed 100 characters"))]
    pub kind: Option<String>,
    #[validate(custom(function = "item_count"))]
    pub count: Option<i64>,
    pub condition: Option<Condition>,
    #[validate(length(max = 100, message = "Brand cannot exceed 100 characters"))]
    pub brand: Option<String>,
    #[validate(length(max = 100, message = "Model cannot exceed 100 characters"))]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub purchase_date: Option<Option<DateTime<Utc>>>,
    #[validate(range(min = 0.0, message = "Purchase price cannot be negative"))]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub warranty_expiry: Option<Option<DateTime<Utc>>>,
    #[validate(length(max = 200, message = "Location cannot exceed 200 characters"))]
    pub location: Option<String>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    pub status: Option<InventoryStatus>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub last_maintenance: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub next_maintenance: Option<Option<DateTime<Utc>>>,
    #[validate(nested)]
    pub images: Option<Vec<Image>>,
    #[validate(nested)]
    pub specifications: Option<Specifications>,
}

impl InventoryUpdate {
    pub fn normalize(&mut self) {
        validation::trim(&mut self.apartment_number);
        validation::trim(&mut self.kind);
        validation::trim(&mut self.brand);
        validation::trim(&mut self.model);
        validation::trim(&mut self.location);
        if let Some(spec) = self.specifications.as_mut() {
            spec.normalize();
        }
    }

    pub fn check(&self) -> AppResult<()> {
        let mut blanks = Vec::new();
        validation::require_non_blank(
            &self.apartment_number,
            "Apartment number is required",
            &mut blanks,
        );
        validation::require_non_blank(&self.kind, "Item type is required", &mut blanks);
        validation::validate_with(self, blanks)
    }

    pub fn apply(self, item: &mut InventoryItem, now: DateTime<Utc>) {
        if let Some(v) = self.apartment_number {
            item.apartment_number = v;
        }
        if let Some(v) = self.category {
            item.category = v;
        }
        if let Some(v) = self.kind {
            item.kind = v;
        }
        if let Some(v) = self.count {
            item.count = v;
        }
        if let Some(v) = self.condition {
            item.condition = v;
        }
        if let Some(v) = self.brand {
            item.brand = v;
        }
        if let Some(v) = self.model {
            item.model = v;
        }
        if let Some(v) = self.purchase_date {
            item.purchase_date = v;
        }
        if let Some(v) = self.purchase_price {
            item.purchase_price = v;
        }
        if let Some(v) = self.warranty_expiry {
            item.warranty_expiry = v;
        }
        if let Some(v) = self.location {
            item.location = v;
        }
        if let Some(v) = self.notes {
            item.notes = v;
        }
        if let Some(v) = self.status {
            item.status = v;
        }
        if let Some(v) = self.last_maintenance {
            item.last_maintenance = v;
        }
        if let Some(v) = self.next_maintenance {
            item.next_maintenance = v;
        }
        if let Some(v) = self.images {
            item.images = v;
        }
        if let Some(v) = self.specifications {
            item.specifications = v;
        }
        item.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceScheduleRequest {
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    #[validate(required(message = "Next maintenance date is required"))]
    pub next_maintenance_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StatusRequest {
    #[validate(required(message = "Status is required"))]
    pub status: Option<InventoryStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConditionRequest {
    #[validate(required(message = "Condition is required"))]
    pub condition: Option<Condition>,
}

/// One entry of a bulk update
///
/// `updates` stays raw JSON so a malformed entry fails on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub updates: serde_json::Value,
}

impl BulkUpdateItem {
    /// Parse, normalize and validate the update document
    pub fn parse_updates(&self) -> AppResult<InventoryUpdate> {
        let mut updates: InventoryUpdate = serde_json::from_value(self.updates.clone())
            .map_err(|e| AppError::validation(e.to_string()))?;
        updates.normalize();
        updates.check()?;
        Ok(updates)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub items: Vec<BulkUpdateItem>,
}

/// Outcome of a single bulk update entry
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateResult {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InventoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkUpdateResult {
    pub fn ok(id: String, data: InventoryView) -> Self {
        Self {
            id,
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(id: String, err: &AppError) -> Self {
        let error = if err.errors.is_empty() {
            err.message.clone()
        } else {
            err.errors.join(", ")
        };
        Self {
            id,
            success: false,
            data: None,
            error: Some(error),
        }
    }
}
