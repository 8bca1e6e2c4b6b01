//! Date-driven lifecycle rules
//!
//! Pure functions over timestamps. Every function takes `now` explicitly so
//! callers decide the reference instant and tests stay deterministic.
//!
//! Durations are whole days rounded up from the absolute millisecond
//! difference, so a stay that started one minute ago counts as one day.

use crate::models::{MaintenanceStatus, Priority, RentalBasis, TenantStatus};
use crate::money;
use chrono::{DateTime, Duration, Utc};

const MS_PER_DAY: i64 = 86_400_000;

/// Open requests older than this many days count towards `overdueRequests`
pub const OVERDUE_WINDOW_DAYS: i64 = 7;

/// Whole days between two instants, rounded up, order-independent
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let ms = (b - a).num_milliseconds().abs();
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

/// Derive a tenant's status from its stay dates
///
/// First match wins:
/// 1. check-in after `now` → pending
/// 2. check-out present and not after `now` → inactive
/// 3. otherwise → active
pub fn calculate_status(
    checkin: DateTime<Utc>,
    checkout: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TenantStatus {
    if checkin > now {
        return TenantStatus::Pending;
    }
    match checkout {
        Some(out) if out <= now => TenantStatus::Inactive,
        _ => TenantStatus::Active,
    }
}

/// Length of stay in days, measured to check-out or to `now` while in residence
pub fn rental_duration_days(
    checkin: DateTime<Utc>,
    checkout: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i64 {
    days_between(checkin, checkout.unwrap_or(now))
}

/// Rent owed for the stay
///
/// Daily basis multiplies by the stay length; monthly basis is the flat amount.
pub fn total_rent(
    basis: RentalBasis,
    rent_amount: f64,
    checkin: DateTime<Utc>,
    checkout: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    match basis {
        RentalBasis::Daily => money::times(rent_amount, rental_duration_days(checkin, checkout, now)),
        RentalBasis::Monthly => rent_amount,
    }
}

/// Priority-aware overdue flag shown on individual requests
pub fn is_overdue(
    status: MaintenanceStatus,
    priority: Priority,
    reported: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status.is_open() && days_between(reported, now) > priority.overdue_threshold_days()
}

/// Flat-window overdue test used by the maintenance overview counter
pub fn counts_as_overdue_request(
    status: MaintenanceStatus,
    reported: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    status.is_open() && reported <= now - Duration::days(OVERDUE_WINDOW_DAYS)
}

/// Days from report to completion, `None` while the request is unfinished
pub fn resolution_time_days(
    reported: DateTime<Utc>,
    completed: Option<DateTime<Utc>>,
) -> Option<i64> {
    completed.map(|c| days_between(reported, c))
}

/// Item age in days, `None` without a purchase date
pub fn age_days(purchased: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    purchased.map(|p| days_between(p, now))
}

/// `None` without a warranty expiry
pub fn warranty_expired(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<bool> {
    expiry.map(|e| now > e)
}

pub fn maintenance_due(next: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    next.is_some_and(|n| n <= now)
}
