//! Maintenance Request Repository

use super::{BaseRepository, ListQuery, RepoError, RepoResult, wire_name};
use crate::db::models::MaintenanceRequest;
use shared::models::{MaintenanceStatus, MaintenanceType, Priority};
use shared::{PageQuery, SortOrder};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "maintenance";

const SORTABLE: &[&str] = &[
    "reportedDate",
    "createdAt",
    "completedDate",
    "apartmentNumber",
    "priority",
    "status",
    "type",
    "estimatedCost",
    "actualCost",
];

#[derive(Debug, Clone, Default)]
pub struct MaintenanceFilter {
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<MaintenanceType>,
    pub apartment_number: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    base: BaseRepository,
}

impl MaintenanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn list(
        &self,
        filter: &MaintenanceFilter,
        page: &PageQuery,
    ) -> RepoResult<(Vec<MaintenanceRequest>, u64)> {
        let q = ListQuery::new(page.limit(), page.offset())
            .filter("status", filter.status.map(|s| wire_name(&s)))
            .filter("priority", filter.priority.map(|p| wire_name(&p)))
            .filter("type", filter.kind.map(|k| wire_name(&k)))
            .filter("apartmentNumber", filter.apartment_number.clone())
            .sort(SORTABLE, filter.sort_by.as_deref(), "reportedDate", filter.sort_order);
        self.base.list(TABLE, &q).await
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MaintenanceRequest>> {
        self.base.select_all(TABLE).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MaintenanceRequest>> {
        self.base.find(TABLE, id).await
    }

    pub async fn create(&self, request: MaintenanceRequest) -> RepoResult<MaintenanceRequest> {
        self.base.insert(TABLE, request).await
    }

    pub async fn save(&self, request: &MaintenanceRequest) -> RepoResult<MaintenanceRequest> {
        let id = request
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Maintenance request has no id".to_string()))?;
        let data = MaintenanceRequest {
            id: None,
            ..request.clone()
        };
        self.base.replace(id, data).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<MaintenanceRequest>(TABLE, id).await
    }

    /// Requests for one apartment, newest report first
    pub async fn find_by_apartment(&self, apartment: &str) -> RepoResult<Vec<MaintenanceRequest>> {
        let requests: Vec<MaintenanceRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM maintenance WHERE apartmentNumber = $apartment \
                 ORDER BY reportedDate DESC",
            )
            .bind(("apartment", apartment.to_string()))
            .await?
            .take(0)?;
        Ok(requests)
    }

    /// Pending requests, most pressing priority first, then oldest report
    pub async fn find_pending(&self) -> RepoResult<Vec<MaintenanceRequest>> {
        let mut requests: Vec<MaintenanceRequest> = self
            .base
            .db()
            .query("SELECT * FROM maintenance WHERE status = 'pending' ORDER BY reportedDate ASC")
            .await?
            .take(0)?;
        // stable sort keeps report order within a priority
        requests.sort_by_key(|r| r.priority.rank());
        Ok(requests)
    }

    /// Completed requests, latest completion first
    pub async fn find_completed(&self, page: &PageQuery) -> RepoResult<(Vec<MaintenanceRequest>, u64)> {
        let q = ListQuery::new(page.limit(), page.offset())
            .filter("status", Some(wire_name(&MaintenanceStatus::Completed)))
            .sort(&[], None, "completedDate", SortOrder::Desc);
        self.base.list(TABLE, &q).await
    }

    /// Urgent requests not yet completed, oldest report first
    pub async fn find_urgent(&self) -> RepoResult<Vec<MaintenanceRequest>> {
        let requests: Vec<MaintenanceRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM maintenance WHERE priority = 'urgent' AND status != 'completed' \
                 ORDER BY reportedDate ASC",
            )
            .await?
            .take(0)?;
        Ok(requests)
    }
}
