//! Maintenance Request Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;
use crate::utils::validation;
use shared::lifecycle;
use shared::models::{MaintenanceStatus, MaintenanceType, Priority};
use shared::{AppError, AppResult, ErrorCode};

/// Photo attached to a request or an inventory item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Image {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Image caption cannot exceed 200 characters"))]
    pub caption: String,
}

/// Maintenance request as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub apartment_number: String,
    #[serde(rename = "type", default)]
    pub kind: MaintenanceType,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: MaintenanceStatus,
    #[serde(with = "serde_helpers::datetime")]
    pub reported_date: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub actual_cost: f64,
    #[serde(default)]
    pub previous_condition: String,
    #[serde(default)]
    pub post_departure_condition: String,
    #[serde(default)]
    pub damages: String,
    #[serde(default)]
    pub deposit_deductions: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(with = "serde_helpers::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRequest {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        lifecycle::is_overdue(self.status, self.priority, self.reported_date, now)
    }

    pub fn resolution_time(&self) -> Option<i64> {
        lifecycle::resolution_time_days(self.reported_date, self.completed_date)
    }

    /// Hand the request to someone and start work
    pub fn assign(&mut self, assignee: String, now: DateTime<Utc>) -> AppResult<()> {
        if matches!(
            self.status,
            MaintenanceStatus::Completed | MaintenanceStatus::Cancelled
        ) {
            return Err(AppError::with_message(
                ErrorCode::MaintenanceClosed,
                format!("Cannot assign a {} maintenance request", self.status),
            ));
        }
        self.assigned_to = assignee;
        self.status = MaintenanceStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// Close the request
    ///
    /// Completion date defaults to `now`, actual cost to 0. Notes replace the
    /// existing ones only when non-empty.
    pub fn complete(&mut self, req: CompleteRequest, now: DateTime<Utc>) -> AppResult<()> {
        if self.status == MaintenanceStatus::Cancelled {
            return Err(AppError::with_message(
                ErrorCode::MaintenanceClosed,
                "Cannot complete a cancelled maintenance request",
            ));
        }
        self.status = MaintenanceStatus::Completed;
        self.completed_date = Some(req.completed_date.unwrap_or(now));
        self.actual_cost = req.actual_cost.unwrap_or_default();
        if let Some(notes) = req.notes.filter(|n| !n.trim().is_empty()) {
            self.notes = notes;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Request as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceView {
    #[serde(flatten)]
    pub request: MaintenanceRequest,
    pub is_overdue: bool,
    pub resolution_time: Option<i64>,
}

impl MaintenanceView {
    pub fn new(request: MaintenanceRequest, now: DateTime<Utc>) -> Self {
        Self {
            is_overdue: request.is_overdue(now),
            resolution_time: request.resolution_time(),
            request,
        }
    }
}

/// Request creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceCreate {
    #[validate(
        required(message = "Apartment number is required"),
        length(max = 20, message = "Apartment number cannot exceed 20 characters")
    )]
    pub apartment_number: Option<String>,
    #[serde(rename = "type")]
    #[validate(required(message = "Maintenance type is required"))]
    pub kind: Option<MaintenanceType>,
    #[validate(
        required(message = "Description is required"),
        length(max = 1000, message = "Description cannot exceed 1000 characters")
    )]
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<MaintenanceStatus>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub reported_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub completed_date: Option<DateTime<Utc>>,
    #[validate(length(max = 100, message = "Assigned to cannot exceed 100 characters"))]
    pub assigned_to: Option<String>,
    #[validate(range(min = 0.0, message = "Estimated cost cannot be negative"))]
    pub estimated_cost: Option<f64>,
    #[validate(range(min = 0.0, message = "Actual cost cannot be negative"))]
    pub actual_cost: Option<f64>,
    #[validate(length(max = 500, message = "Previous condition cannot exceed 500 characters"))]
    pub previous_condition: Option<String>,
    #[validate(length(
        max = 500,
        message = "Post departure condition cannot exceed 500 characters"
    ))]
    pub post_departure_condition: Option<String>,
    #[validate(length(max = 500, message = "Damages description cannot exceed 500 characters"))]
    pub damages: Option<String>,
    #[validate(range(min = 0.0, message = "Deposit deductions cannot be negative"))]
    pub deposit_deductions: Option<f64>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub images: Vec<Image>,
}

impl MaintenanceCreate {
    pub fn normalize(&mut self) {
        validation::clean(&mut self.apartment_number);
        validation::clean(&mut self.description);
        validation::clean(&mut self.assigned_to);
        validation::clean(&mut self.notes);
    }

    pub fn check(&self) -> AppResult<()> {
        validation::validate_payload(self)
    }

    pub fn into_request(self, now: DateTime<Utc>) -> MaintenanceRequest {
        MaintenanceRequest {
            id: None,
            apartment_number: self.apartment_number.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            reported_date: self.reported_date.unwrap_or(now),
            completed_date: self.completed_date,
            assigned_to: self.assigned_to.unwrap_or_default(),
            estimated_cost: self.estimated_cost.unwrap_or_default(),
            actual_cost: self.actual_cost.unwrap_or_default(),
            previous_condition: self.previous_condition.unwrap_or_default(),
            post_departure_condition: self.post_departure_condition.unwrap_or_default(),
            damages: self.damages.unwrap_or_default(),
            deposit_deductions: self.deposit_deductions.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            images: self.images,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request update payload (all optional)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceUpdate {
    #[validate(length(max = 20, message = "Apartment number cannot exceed 20 characters"))]
    pub apartment_number: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MaintenanceType>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<MaintenanceStatus>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub reported_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub completed_date: Option<Option<DateTime<Utc>>>,
    #[validate(length(max = 100, message = "Assigned to cannot exceed 100 characters"))]
    pub assigned_to: Option<String>,
    #[validate(range(min = 0.0, message = "Estimated cost cannot be negative"))]
    pub estimated_cost: Option<f64>,
    #[validate(range(min = 0.0, message = "Actual cost cannot be negative"))]
    pub actual_cost: Option<f64>,
    #[validate(length(max = 500, message = "Previous condition cannot exceed 500 characters"))]
    pub previous_condition: Option<String>,
    #[validate(length(
        max = 500,
        message = "Post departure condition cannot exceed 500 characters"
    ))]
    pub post_departure_condition: Option<String>,
    #[validate(length(max = 500, message = "Damages description cannot exceed 500 characters"))]
    pub damages: Option<String>,
    #[validate(range(min = 0.0, message = "Deposit deductions cannot be negative"))]
    pub deposit_deductions: Option<f64>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
    #[validate(nested)]
    pub images: Option<Vec<Image>>,
}

impl MaintenanceUpdate {
    pub fn normalize(&mut self) {
        validation::trim(&mut self.apartment_number);
        validation::trim(&mut self.description);
        validation::trim(&mut self.assigned_to);
    }

    pub fn check(&self) -> AppResult<()> {
        let mut blanks = Vec::new();
        validation::require_non_blank(
            &self.apartment_number,
            "Apartment number is required",
            &mut blanks,
        );
        validation::require_non_blank(&self.description, "Description is required", &mut blanks);
        validation::validate_with(self, blanks)
    }

    pub fn apply(self, req: &mut MaintenanceRequest, now: DateTime<Utc>) {
        if let Some(v) = self.apartment_number {
            req.apartment_number = v;
        }
        if let Some(v) = self.kind {
            req.kind = v;
        }
        if let Some(v) = self.description {
            req.description = v;
        }
        if let Some(v) = self.priority {
            req.priority = v;
        }
        if let Some(v) = self.status {
            req.status = v;
        }
        if let Some(v) = self.reported_date {
            req.reported_date = v;
        }
        if let Some(v) = self.completed_date {
            req.completed_date = v;
        }
        if let Some(v) = self.assigned_to {
            req.assigned_to = v;
        }
        if let Some(v) = self.estimated_cost {
            req.estimated_cost = v;
        }
        if let Some(v) = self.actual_cost {
            req.actual_cost = v;
        }
        if let Some(v) = self.previous_condition {
            req.previous_condition = v;
        }
        if let Some(v) = self.post_departure_condition {
            req.post_departure_condition = v;
        }
        if let Some(v) = self.damages {
            req.damages = v;
        }
        if let Some(v) = self.deposit_deductions {
            req.deposit_deductions = v;
        }
        if let Some(v) = self.notes {
            req.notes = v;
        }
        if let Some(v) = self.images {
            req.images = v;
        }
        req.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub completed_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "Actual cost cannot be negative"))]
    pub actual_cost: Option<f64>,
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[validate(
        required(message = "Assigned to is required"),
        length(max = 100, message = "Assigned to cannot exceed 100 characters")
    )]
    pub assigned_to: Option<String>,
}

impl AssignRequest {
    /// Validate and return the trimmed assignee
    pub fn into_assignee(mut self) -> AppResult<String> {
        validation::clean(&mut self.assigned_to);
        validation::validate_payload(&self)?;
        Ok(self.assigned_to.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn sample(priority: Priority, reported_days_ago: i64) -> MaintenanceRequest {
        let mut payload: MaintenanceCreate = serde_json::from_value(serde_json::json!({
            "apartmentNumber": "4C",
            "type": "plumbing",
            "description": "Leaking tap",
            "priority": priority,
            "reportedDate": (now() - Duration::days(reported_days_ago)).to_rfc3339()
        }))
        .unwrap();
        payload.normalize();
        payload.check().unwrap();
        payload.into_request(now())
    }

    #[test]
    fn test_create_defaults() {
        let req = sample(Priority::Medium, 0);
        assert_eq!(req.status, MaintenanceStatus::Pending);
        assert_eq!(req.kind, MaintenanceType::Plumbing);
        assert_eq!(req.actual_cost, 0.0);
        assert!(req.images.is_empty());
    }

    #[test]
    fn test_create_requires_fields() {
        let payload: MaintenanceCreate = serde_json::from_value(serde_json::json!({
            "estimatedCost": -5,
            "images": [{ "url": "a.jpg", "caption": "x".repeat(201) }]
        }))
        .unwrap();
        let err = payload.check().unwrap_err();
        for expected in [
            "Apartment number is required",
            "Maintenance type is required",
            "Description is required",
            "Estimated cost cannot be negative",
            "Image caption cannot exceed 200 characters",
        ] {
            assert!(err.errors.iter().any(|e| e == expected), "missing {expected:?}");
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let parsed = serde_json::from_value::<MaintenanceCreate>(serde_json::json!({
            "type": "gardening"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_overdue_depends_on_priority() {
        assert!(sample(Priority::Urgent, 2).is_overdue(now()));
        assert!(!sample(Priority::Low, 10).is_overdue(now()));
        assert!(sample(Priority::Low, 15).is_overdue(now()));

        let mut done = sample(Priority::Urgent, 5);
        done.complete(CompleteRequest::default(), now()).unwrap();
        assert!(!done.is_overdue(now()));
    }

    #[test]
    fn test_complete_sets_date_cost_and_keeps_notes_when_blank() {
        let mut req = sample(Priority::High, 3);
        req.notes = "Parts ordered".into();
        req.complete(
            CompleteRequest {
                completed_date: None,
                actual_cost: Some(45.5),
                notes: Some("  ".into()),
            },
            now(),
        )
        .unwrap();
        assert_eq!(req.status, MaintenanceStatus::Completed);
        assert_eq!(req.completed_date, Some(now()));
        assert_eq!(req.actual_cost, 45.5);
        assert_eq!(req.notes, "Parts ordered");
        assert_eq!(req.resolution_time(), Some(3));
    }

    #[test]
    fn test_closed_requests_reject_workflow_changes() {
        let mut req = sample(Priority::High, 1);
        req.status = MaintenanceStatus::Cancelled;
        let err = req.complete(CompleteRequest::default(), now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MaintenanceClosed);
        let err = req.assign("Bob".into(), now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MaintenanceClosed);
    }

    #[test]
    fn test_assignee_must_not_be_blank() {
        let blank = AssignRequest {
            assigned_to: Some("   ".into()),
        };
        let err = blank.into_assignee().unwrap_err();
        assert_eq!(err.errors, vec!["Assigned to is required"]);

        let ok = AssignRequest {
            assigned_to: Some(" Bob ".into()),
        };
        assert_eq!(ok.into_assignee().unwrap(), "Bob");
    }

    #[test]
    fn test_assign_starts_work() {
        let mut req = sample(Priority::Low, 1);
        req.assign("Bob".into(), now()).unwrap();
        assert_eq!(req.status, MaintenanceStatus::InProgress);
        assert_eq!(req.assigned_to, "Bob");
    }

    #[test]
    fn test_view_wire_shape() {
        let view = MaintenanceView::new(sample(Priority::Urgent, 2), now());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "plumbing");
        assert_eq!(json["isOverdue"], true);
        assert!(json["resolutionTime"].is_null());
        assert_eq!(json["status"], "pending");
    }
}
