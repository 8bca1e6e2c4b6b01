//! Tenant lifecycle synchronization
//!
//! Stored tenant statuses go stale as time passes (a future check-in
//! arrives, a check-out date passes), and so does the total rent of a
//! daily stay. [`synchronize_all`] re-derives both against a single `now`
//! and persists the records where either changed.
//!
//! Writes are independent: one tenant failing to save is reported in
//! [`SyncReport::failed`] and never aborts the others.

use std::future::Future;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::db::models::Tenant;
use crate::db::repository::{RepoResult, TenantRepository};
use shared::lifecycle;
use shared::models::TenantStatus;

/// Values the synchronizer recomputes for one tenant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedValues {
    pub status: TenantStatus,
    pub total_rent: f64,
}

impl DerivedValues {
    pub fn of(tenant: &Tenant, now: DateTime<Utc>) -> Self {
        Self {
            status: lifecycle::calculate_status(tenant.checkin_date, tenant.checkout_date, now),
            total_rent: lifecycle::total_rent(
                tenant.rental_basis,
                tenant.rent_amount,
                tenant.checkin_date,
                tenant.checkout_date,
                now,
            ),
        }
    }

    fn differ_from(&self, tenant: &Tenant) -> bool {
        self.status != tenant.status || self.total_rent != tenant.total_rent
    }
}

/// Storage used by the synchronizer
pub trait TenantStatusStore {
    fn load_all(&self) -> impl Future<Output = RepoResult<Vec<Tenant>>> + Send;

    fn store_derived(
        &self,
        id: &str,
        derived: DerivedValues,
        now: DateTime<Utc>,
    ) -> impl Future<Output = RepoResult<()>> + Send;
}

impl TenantStatusStore for TenantRepository {
    async fn load_all(&self) -> RepoResult<Vec<Tenant>> {
        self.find_all().await
    }

    async fn store_derived(
        &self,
        id: &str,
        derived: DerivedValues,
        now: DateTime<Utc>,
    ) -> RepoResult<()> {
        self.update_derived(id, derived.status, derived.total_rent, now)
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncFailure {
    pub id: String,
    pub reason: String,
}

/// Outcome of one synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    /// Tenants whose stored status or total rent was changed
    pub updated: usize,
    pub failed: Vec<SyncFailure>,
}

/// Re-derive and persist every stale tenant status and total rent
///
/// At most `concurrency` writes are in flight at once. Failing to load the
/// tenant list fails the whole pass.
pub async fn synchronize_all<S>(
    store: &S,
    now: DateTime<Utc>,
    concurrency: usize,
) -> RepoResult<SyncReport>
where
    S: TenantStatusStore + Sync,
{
    let tenants = store.load_all().await?;

    let stale: Vec<(String, DerivedValues)> = tenants
        .iter()
        .filter_map(|t| {
            let derived = DerivedValues::of(t, now);
            let id = t.id.as_ref()?.to_string();
            derived.differ_from(t).then_some((id, derived))
        })
        .collect();

    if stale.is_empty() {
        tracing::debug!(checked = tenants.len(), "Tenant statuses already current");
        return Ok(SyncReport::default());
    }

    let outcomes: Vec<(String, RepoResult<()>)> = stream::iter(stale)
        .map(|(id, derived)| async move {
            let result = store.store_derived(&id, derived, now).await;
            (id, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = SyncReport::default();
    for (id, result) in outcomes {
        match result {
            Ok(()) => report.updated += 1,
            Err(e) => {
                tracing::warn!(tenant = %id, error = %e, "Failed to update tenant status");
                report.failed.push(SyncFailure {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }
    report.failed.sort_by(|a, b| a.id.cmp(&b.id));

    tracing::info!(
        checked = tenants.len(),
        updated = report.updated,
        failed = report.failed.len(),
        "Tenant status synchronization finished"
    );
    Ok(report)
}
