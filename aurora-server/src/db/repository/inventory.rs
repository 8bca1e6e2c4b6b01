//! Inventory Repository

use super::{BaseRepository, ListQuery, RepoError, RepoResult, wire_name};
use crate::db::models::InventoryItem;
use crate::db::models::serde_helpers::format_datetime;
use chrono::{DateTime, Utc};
use shared::models::{Condition, InventoryCategory, InventoryStatus};
use shared::{PageQuery, SortOrder};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "inventory";

const SORTABLE: &[&str] = &[
    "createdAt",
    "apartmentNumber",
    "category",
    "type",
    "count",
    "condition",
    "status",
    "purchaseDate",
    "purchasePrice",
    "nextMaintenance",
];

const SEARCHABLE: &[&str] = &["type", "brand", "model", "apartmentNumber"];

pub const SEARCH_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub category: Option<InventoryCategory>,
    pub status: Option<InventoryStatus>,
    pub condition: Option<Condition>,
    pub apartment_number: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
}

impl InventoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn list(
        &self,
        filter: &InventoryFilter,
        page: &PageQuery,
    ) -> RepoResult<(Vec<InventoryItem>, u64)> {
        let q = ListQuery::new(page.limit(), page.offset())
            .filter("category", filter.category.map(|c| c.as_str().to_string()))
            .filter("status", filter.status.map(|s| s.as_str().to_string()))
            .filter("condition", filter.condition.map(|c| wire_name(&c)))
            .filter("apartmentNumber", filter.apartment_number.clone())
            .sort(SORTABLE, filter.sort_by.as_deref(), "createdAt", filter.sort_order);
        self.base.list(TABLE, &q).await
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        self.base.select_all(TABLE).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<InventoryItem>> {
        self.base.find(TABLE, id).await
    }

    pub async fn create(&self, item: InventoryItem) -> RepoResult<InventoryItem> {
        self.base.insert(TABLE, item).await
    }

    pub async fn save(&self, item: &InventoryItem) -> RepoResult<InventoryItem> {
        let id = item
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Inventory item has no id".to_string()))?;
        let data = InventoryItem {
            id: None,
            ..item.clone()
        };
        self.base.replace(id, data).await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.remove::<InventoryItem>(TABLE, id).await
    }

    /// Items of one category, newest first
    pub async fn find_by_category(
        &self,
        category: InventoryCategory,
        page: &PageQuery,
    ) -> RepoResult<(Vec<InventoryItem>, u64)> {
        let q = ListQuery::new(page.limit(), page.offset())
            .filter("category", Some(category.as_str().to_string()))
            .sort(&[], None, "createdAt", SortOrder::Desc);
        self.base.list(TABLE, &q).await
    }

    /// Items of one apartment grouped by category then type
    pub async fn find_by_apartment(&self, apartment: &str) -> RepoResult<Vec<InventoryItem>> {
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM inventory WHERE apartmentNumber = $apartment \
                 ORDER BY category ASC, `type` ASC",
            )
            .bind(("apartment", apartment.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Items whose next maintenance is due by `now`, excluding retired ones
    pub async fn find_maintenance_due(&self, now: DateTime<Utc>) -> RepoResult<Vec<InventoryItem>> {
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query(
                "SELECT * FROM inventory WHERE type::is::string(nextMaintenance) \
                 AND nextMaintenance <= $now AND status != 'retired' \
                 ORDER BY nextMaintenance ASC",
            )
            .bind(("now", format_datetime(&now)))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn search(&self, term: &str) -> RepoResult<Vec<InventoryItem>> {
        let q = ListQuery::new(SEARCH_LIMIT, 0).search(SEARCHABLE, Some(term));
        let (items, _) = self.base.list(TABLE, &q).await?;
        Ok(items)
    }
}
