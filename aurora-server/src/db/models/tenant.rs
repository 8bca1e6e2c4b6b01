//! Tenant Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;
use crate::utils::validation::{self, email_or_empty};
use shared::lifecycle;
use shared::models::{
    BookingSource, IdVerification, RentalBasis, TenantStatus, empty_string_as_none,
};
use shared::{AppError, AppResult, ErrorCode};

/// Stay window currently being billed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalPeriod {
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Tenant record as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub apartment_number: String,
    #[serde(with = "serde_helpers::datetime")]
    pub checkin_date: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::option_datetime")]
    pub checkout_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rental_basis: RentalBasis,
    pub rent_amount: f64,
    #[serde(default)]
    pub deposit: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub booking_source: Option<BookingSource>,
    #[serde(default)]
    pub special_requests: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub id_verification: IdVerification,
    #[serde(default)]
    pub current_rental_period: RentalPeriod,
    #[serde(default)]
    pub status: TenantStatus,
    #[serde(default)]
    pub total_rent: f64,
    #[serde(with = "serde_helpers::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Recompute status and total rent from the stay dates
    pub fn refresh_derived(&mut self, now: DateTime<Utc>) {
        self.status = lifecycle::calculate_status(self.checkin_date, self.checkout_date, now);
        self.total_rent = lifecycle::total_rent(
            self.rental_basis,
            self.rent_amount,
            self.checkin_date,
            self.checkout_date,
            now,
        );
    }

    pub fn rental_duration(&self, now: DateTime<Utc>) -> i64 {
        lifecycle::rental_duration_days(self.checkin_date, self.checkout_date, now)
    }

    /// Check the tenant out and re-derive status
    pub fn checkout(&mut self, at: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
        check_stay(self.checkin_date, Some(at))?;
        self.checkout_date = Some(at);
        self.current_rental_period.end_date = Some(at);
        self.refresh_derived(now);
        self.updated_at = now;
        Ok(())
    }
}

/// Reject a check-out that precedes check-in
pub fn check_stay(checkin: DateTime<Utc>, checkout: Option<DateTime<Utc>>) -> AppResult<()> {
    match checkout {
        Some(out) if out < checkin => Err(AppError::new(ErrorCode::TenantInvalidStay)),
        _ => Ok(()),
    }
}

/// Tenant as returned by the API, with read-time derived values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantView {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub rental_duration: i64,
}

impl TenantView {
    pub fn new(tenant: Tenant, now: DateTime<Utc>) -> Self {
        Self {
            rental_duration: tenant.rental_duration(now),
            tenant,
        }
    }
}

/// Dashboard summary row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTenant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub apartment_number: String,
    #[serde(with = "serde_helpers::datetime")]
    pub checkin_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TenantStatus,
}

/// Tenant creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TenantCreate {
    #[validate(
        required(message = "Tenant name is required"),
        length(max = 100, message = "Name cannot exceed 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Phone number is required"),
        length(max = 20, message = "Phone number cannot exceed 20 characters")
    )]
    pub phone: Option<String>,
    #[validate(
        length(max = 100, message = "Email cannot exceed 100 characters"),
        custom(function = "email_or_empty")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Apartment number is required"),
        length(max = 20, message = "Apartment number cannot exceed 20 characters")
    )]
    pub apartment_number: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    #[validate(required(message = "Check-in date is required"))]
    pub checkin_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub checkout_date: Option<DateTime<Utc>>,
    pub rental_basis: Option<RentalBasis>,
    #[validate(
        required(message = "Rent amount is required"),
        range(min = 0.0, message = "Rent amount cannot be negative")
    )]
    pub rent_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "Deposit cannot be negative"))]
    pub deposit: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub booking_source: Option<BookingSource>,
    #[validate(length(max = 500, message = "Special requests cannot exceed 500 characters"))]
    pub special_requests: Option<String>,
    #[validate(length(max = 1000, message = "Remarks cannot exceed 1000 characters"))]
    pub remarks: Option<String>,
    pub id_verification: Option<IdVerification>,
    pub current_rental_period: Option<RentalPeriod>,
}

impl TenantCreate {
    /// Trim text, lower-case the email, drop blanks
    pub fn normalize(&mut self) {
        validation::clean(&mut self.name);
        validation::clean(&mut self.phone);
        validation::clean(&mut self.email);
        validation::clean(&mut self.apartment_number);
        validation::clean(&mut self.special_requests);
        validation::clean(&mut self.remarks);
        if let Some(email) = self.email.as_mut() {
            *email = email.to_lowercase();
        }
    }

    pub fn check(&self) -> AppResult<()> {
        validation::validate_payload(self)?;
        if let Some(checkin) = self.checkin_date {
            check_stay(checkin, self.checkout_date)?;
        }
        Ok(())
    }

    /// Build the stored record; call after [`check`](Self::check)
    pub fn into_tenant(self, now: DateTime<Utc>) -> Tenant {
        let checkin_date = self.checkin_date.unwrap_or(now);
        let current_rental_period = self.current_rental_period.unwrap_or(RentalPeriod {
            start_date: Some(checkin_date),
            end_date: self.checkout_date,
        });

        let mut tenant = Tenant {
            id: None,
            name: self.name.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            apartment_number: self.apartment_number.unwrap_or_default(),
            checkin_date,
            checkout_date: self.checkout_date,
            rental_basis: self.rental_basis.unwrap_or_default(),
            rent_amount: self.rent_amount.unwrap_or_default(),
            deposit: self.deposit.unwrap_or_default(),
            booking_source: self.booking_source,
            special_requests: self.special_requests.unwrap_or_default(),
            remarks: self.remarks.unwrap_or_default(),
            id_verification: self.id_verification.unwrap_or_default(),
            current_rental_period,
            status: TenantStatus::default(),
            total_rent: 0.0,
            created_at: now,
            updated_at: now,
        };
        tenant.refresh_derived(now);
        tenant
    }
}

/// Tenant update payload (all optional)
///
/// `checkoutDate: null` clears the check-out date; an absent field leaves it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    #[validate(length(max = 100, message = "Name cannot exceed 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "Phone number cannot exceed 20 characters"))]
    pub phone: Option<String>,
    #[validate(
        length(max = 100, message = "Email cannot exceed 100 characters"),
        custom(function = "email_or_empty")
    )]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Apartment number cannot exceed 20 characters"))]
    pub apartment_number: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub checkin_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable_datetime")]
    pub checkout_date: Option<Option<DateTime<Utc>>>,
    pub rental_basis: Option<RentalBasis>,
    #[validate(range(min = 0.0, message = "Rent amount cannot be negative"))]
    pub rent_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "Deposit cannot be negative"))]
    pub deposit: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub booking_source: Option<BookingSource>,
    #[validate(length(max = 500, message = "Special requests cannot exceed 500 characters"))]
    pub special_requests: Option<String>,
    #[validate(length(max = 1000, message = "Remarks cannot exceed 1000 characters"))]
    pub remarks: Option<String>,
    pub id_verification: Option<IdVerification>,
    pub current_rental_period: Option<RentalPeriod>,
}

impl TenantUpdate {
    pub fn normalize(&mut self) {
        validation::trim(&mut self.name);
        validation::trim(&mut self.phone);
        validation::trim(&mut self.email);
        validation::trim(&mut self.apartment_number);
        if let Some(email) = self.email.as_mut() {
            *email = email.to_lowercase();
        }
    }

    pub fn check(&self) -> AppResult<()> {
        let mut blanks = Vec::new();
        validation::require_non_blank(&self.name, "Tenant name is required", &mut blanks);
        validation::require_non_blank(&self.phone, "Phone number is required", &mut blanks);
        validation::require_non_blank(
            &self.apartment_number,
            "Apartment number is required",
            &mut blanks,
        );
        validation::validate_with(self, blanks)
    }

    /// Apply onto an existing record and re-derive status and total rent
    pub fn apply(self, tenant: &mut Tenant, now: DateTime<Utc>) -> AppResult<()> {
        if let Some(v) = self.name {
            tenant.name = v;
        }
        if let Some(v) = self.phone {
            tenant.phone = v;
        }
        if let Some(v) = self.email {
            tenant.email = v;
        }
        if let Some(v) = self.apartment_number {
            tenant.apartment_number = v;
        }
        if let Some(v) = self.checkin_date {
            tenant.checkin_date = v;
        }
        if let Some(v) = self.checkout_date {
            tenant.checkout_date = v;
        }
        if let Some(v) = self.rental_basis {
            tenant.rental_basis = v;
        }
        if let Some(v) = self.rent_amount {
            tenant.rent_amount = v;
        }
        if let Some(v) = self.deposit {
            tenant.deposit = v;
        }
        if self.booking_source.is_some() {
            tenant.booking_source = self.booking_source;
        }
        if let Some(v) = self.special_requests {
            tenant.special_requests = v;
        }
        if let Some(v) = self.remarks {
            tenant.remarks = v;
        }
        if let Some(v) = self.id_verification {
            tenant.id_verification = v;
        }

        check_stay(tenant.checkin_date, tenant.checkout_date)?;

        tenant.current_rental_period = self.current_rental_period.unwrap_or(RentalPeriod {
            start_date: Some(tenant.checkin_date),
            end_date: tenant.checkout_date,
        });

        tenant.refresh_derived(now);
        tenant.updated_at = now;
        Ok(())
    }
}

/// Check-out payload; the date defaults to now
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default, deserialize_with = "serde_helpers::option_datetime::deserialize")]
    pub checkout_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn create(json: serde_json::Value) -> TenantCreate {
        let mut payload: TenantCreate = serde_json::from_value(json).unwrap();
        payload.normalize();
        payload
    }

    fn sample() -> Tenant {
        create(serde_json::json!({
            "name": "Ana Silva",
            "phone": "555-0101",
            "apartmentNumber": "12B",
            "checkinDate": (now() - Duration::days(3)).to_rfc3339(),
            "rentalBasis": "daily",
            "rentAmount": 100
        }))
        .into_tenant(now())
    }

    #[test]
    fn test_create_derives_status_and_rent() {
        let tenant = sample();
        assert_eq!(tenant.status, TenantStatus::Active);
        assert_eq!(tenant.total_rent, 300.0);
        assert_eq!(tenant.id_verification, IdVerification::Pending);
        assert_eq!(
            tenant.current_rental_period.start_date,
            Some(tenant.checkin_date)
        );
        assert_eq!(tenant.rental_duration(now()), 3);
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let payload = create(serde_json::json!({ "name": "  ", "email": "BAD" }));
        let err = payload.check().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        for expected in [
            "Tenant name is required",
            "Phone number is required",
            "Apartment number is required",
            "Check-in date is required",
            "Rent amount is required",
            "Please enter a valid email",
        ] {
            assert!(
                err.errors.iter().any(|e| e == expected),
                "missing {expected:?} in {:?}",
                err.errors
            );
        }
    }

    #[test]
    fn test_create_lowercases_email_and_accepts_empty_booking_source() {
        let payload = create(serde_json::json!({
            "name": "Ana",
            "phone": "1",
            "apartmentNumber": "1A",
            "checkinDate": "2024-06-01",
            "rentAmount": 900,
            "email": " Ana@Example.COM ",
            "bookingSource": ""
        }));
        assert!(payload.check().is_ok());
        let tenant = payload.into_tenant(now());
        assert_eq!(tenant.email, "ana@example.com");
        assert_eq!(tenant.booking_source, None);
        assert_eq!(tenant.total_rent, 900.0);
    }

    #[test]
    fn test_checkout_before_checkin_is_rejected() {
        let payload = create(serde_json::json!({
            "name": "Ana",
            "phone": "1",
            "apartmentNumber": "1A",
            "checkinDate": "2024-06-10",
            "checkoutDate": "2024-06-01",
            "rentAmount": 900
        }));
        let err = payload.check().unwrap_err();
        assert_eq!(err.code, ErrorCode::TenantInvalidStay);
    }

    #[test]
    fn test_update_rederives_status() {
        let mut tenant = sample();
        let mut patch: TenantUpdate = serde_json::from_value(serde_json::json!({
            "checkoutDate": (now() - Duration::days(1)).to_rfc3339()
        }))
        .unwrap();
        patch.normalize();
        patch.check().unwrap();
        patch.apply(&mut tenant, now()).unwrap();

        assert_eq!(tenant.status, TenantStatus::Inactive);
        assert_eq!(tenant.total_rent, 200.0);
        assert_eq!(tenant.current_rental_period.end_date, tenant.checkout_date);
    }

    #[test]
    fn test_update_null_checkout_reopens_stay() {
        let mut tenant = sample();
        tenant.checkout(now() - Duration::days(1), now()).unwrap();
        assert_eq!(tenant.status, TenantStatus::Inactive);

        let patch: TenantUpdate =
            serde_json::from_value(serde_json::json!({ "checkoutDate": null })).unwrap();
        patch.apply(&mut tenant, now()).unwrap();
        assert_eq!(tenant.checkout_date, None);
        assert_eq!(tenant.status, TenantStatus::Active);
    }

    #[test]
    fn test_update_rejects_blank_required_field() {
        let mut patch: TenantUpdate =
            serde_json::from_value(serde_json::json!({ "name": "   " })).unwrap();
        patch.normalize();
        let err = patch.check().unwrap_err();
        assert_eq!(err.errors, vec!["Tenant name is required"]);
    }

    #[test]
    fn test_view_serializes_flat_camel_case() {
        let view = TenantView::new(sample(), now());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["rentalDuration"], 3);
        assert_eq!(json["apartmentNumber"], "12B");
        assert_eq!(json["rentalBasis"], "daily");
        assert!(json["checkoutDate"].is_null());
        assert!(json.get("id").is_none());
    }
}
