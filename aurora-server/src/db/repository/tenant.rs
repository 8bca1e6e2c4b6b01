//! Tenant Repository

use super::{BaseRepository, ListQuery, RepoError, RepoResult, record_id};
use crate::db::models::{RecentTenant, Tenant};
use crate::db::models::serde_helpers::format_datetime;
use chrono::{DateTime, Utc};
use shared::models::TenantStatus;
use shared::{PageQuery, SortOrder};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "tenant";

const SORTABLE: &[&str] = &[
    "createdAt",
    "name",
    "apartmentNumber",
    "checkinDate",
    "checkoutDate",
    "rentAmount",
    "status",
];

const SEARCHABLE: &[&str] = &["name", "apartmentNumber", "phone", "email"];

/// Number of rows returned by the quick search endpoint
pub const SEARCH_LIMIT: u32 = 10;

/// Number of rows on the dashboard
pub const RECENT_LIMIT: u32 = 5;

/// Tenant list filters
#[derive(Debug, Clone, Default)]
pub struct TenantFilter {
    pub search: Option<String>,
    pub status: Option<TenantStatus>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

#[derive(Clone)]
pub struct TenantRepository {
    base: BaseRepository,
}

impl TenantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// One page of tenants plus the total match count
    pub async fn list(&self, filter: &TenantFilter, page: &PageQuery) -> RepoResult<(Vec<Tenant>, u64)> {
        let q = ListQuery::new(page.limit(), page.offset())
            .filter("status", filter.status.map(|s| s.as_str().to_string()))
            .search(SEARCHABLE, filter.search.as_deref())
            .sort(SORTABLE, filter.sort_by.as_deref(), "createdAt", filter.sort_order);
        self.base.list(TABLE, &q).await
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Tenant>> {
        self.base.select_all(TABLE).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Tenant>> {
        self.base.find(TABLE, id).await
    }

    pub async fn create(&self, tenant: Tenant) -> RepoResult<Tenant> {
        self.base.insert(TABLE, tenant).await
    }

    /// Persist every field of an existing tenant
    pub async fn save(&self, tenant: &Tenant) -> RepoResult<Tenant> {
        let id = tenant
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Tenant has no id".to_string()))?;
        let data = Tenant {
            id: None,
            ..tenant.clone()
        };
        self.base.replace(id, data).await
    }

    /// Overwrite only the derived fields
    pub async fn update_derived(
        &self,
        id: &str,
        status: TenantStatus,
        total_rent: f64,
        now: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET status = $status, totalRent = $total_rent, updatedAt = $now")
            .bind(("id", record_id(TABLE, id)))
            .bind(("status", status.as_str().to_string()))
            .bind(("total_rent", total_rent))
            .bind(("now", format_datetime(&now)))
            .await?;
        let updated: Vec<Tenant> = result.take(0)?;
        if updated.is_empty() {
            return Err(RepoError::NotFound(format!("Tenant {id} not found")));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<Tenant>(TABLE, id).await
    }

    /// Tenants of one apartment, latest check-in first
    pub async fn find_by_apartment(&self, apartment: &str) -> RepoResult<Vec<Tenant>> {
        let tenants: Vec<Tenant> = self
            .base
            .db()
            .query("SELECT * FROM tenant WHERE apartmentNumber = $apartment ORDER BY checkinDate DESC")
            .bind(("apartment", apartment.to_string()))
            .await?
            .take(0)?;
        Ok(tenants)
    }

    pub async fn search(&self, term: &str) -> RepoResult<Vec<Tenant>> {
        let q = ListQuery::new(SEARCH_LIMIT, 0).search(SEARCHABLE, Some(term));
        let (tenants, _) = self.base.list(TABLE, &q).await?;
        Ok(tenants)
    }

    /// Most recently created tenants for the dashboard
    pub async fn recent(&self) -> RepoResult<Vec<RecentTenant>> {
        let tenants: Vec<RecentTenant> = self
            .base
            .db()
            .query(
                "SELECT id, name, apartmentNumber, checkinDate, status, createdAt FROM tenant \
                 ORDER BY createdAt DESC LIMIT $limit",
            )
            .bind(("limit", RECENT_LIMIT))
            .await?
            .take(0)?;
        Ok(tenants)
    }
}
