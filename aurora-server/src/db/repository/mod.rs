//! Repository Module
//!
//! CRUD and listing queries over the `tenant`, `maintenance` and `inventory`
//! tables.

pub mod inventory;
pub mod maintenance;
pub mod tenant;

// Re-exports
pub use inventory::InventoryRepository;
pub use maintenance::MaintenanceRepository;
pub use tenant::TenantRepository;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{AppError, AppResult, SortOrder};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(shared::ErrorCode::NotFound, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Replace raw store failures with an operation-level message
///
/// The underlying cause is logged; only `context` reaches the client.
pub trait RepoResultExt<T> {
    fn context(self, context: &str) -> AppResult<T>;
}

impl<T> RepoResultExt<T> for RepoResult<T> {
    fn context(self, context: &str) -> AppResult<T> {
        self.map_err(|err| match err {
            RepoError::Database(cause) => {
                tracing::error!(error = %cause, "{}", context);
                AppError::database(context)
            }
            other => other.into(),
        })
    }
}

/// Build a record id from either `table:key` or a bare key
///
/// Ids from another table keep their prefix in the key and simply match nothing.
pub fn record_id(table: &str, raw: &str) -> RecordId {
    let key = raw
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(raw);
    let key = key
        .strip_prefix('⟨')
        .and_then(|k| k.strip_suffix('⟩'))
        .unwrap_or(key);
    RecordId::from_table_key(table, key)
}

/// Enum value as stored (its serde wire name)
pub fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct CountResult {
    total: u64,
}

/// Filtered, sorted, paginated listing
///
/// Field names are fixed by the repositories; only values come from clients
/// and are always bound as parameters.
#[derive(Debug, Clone)]
pub struct ListQuery {
    filters: Vec<(&'static str, String)>,
    search: Option<(&'static [&'static str], String)>,
    order_by: String,
    limit: u32,
    offset: u64,
}

impl ListQuery {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            filters: Vec::new(),
            search: None,
            order_by: "createdAt DESC".to_string(),
            limit,
            offset,
        }
    }

    /// Equality filter on a field
    pub fn filter(mut self, field: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.filters.push((field, value));
        }
        self
    }

    /// Case-insensitive substring match on any of `fields`
    pub fn search(mut self, fields: &'static [&'static str], term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.search = Some((fields, term.to_lowercase()));
        }
        self
    }

    /// Sort by `requested` when whitelisted, otherwise by `default`
    pub fn sort(
        mut self,
        allowed: &[&'static str],
        requested: Option<&str>,
        default: &'static str,
        order: SortOrder,
    ) -> Self {
        let field = requested
            .and_then(|r| allowed.iter().find(|f| **f == r))
            .copied()
            .unwrap_or(default);
        self.order_by = format!("{} {}", escape_field(field), order.as_sql());
        self
    }

    fn where_clause(&self) -> String {
        let mut conditions: Vec<String> = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, (field, _))| format!("{} = $f{}", escape_field(field), i))
            .collect();

        if let Some((fields, _)) = &self.search {
            let any = fields
                .iter()
                .map(|f| format!("string::contains(string::lowercase({}), $q)", escape_field(f)))
                .collect::<Vec<_>>()
                .join(" OR ");
            conditions.push(format!("({any})"));
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }
}

/// `type` is a SurrealQL keyword
fn escape_field(field: &str) -> String {
    if field == "type" {
        "`type`".to_string()
    } else {
        field.to_string()
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// One page of `table` plus the total number of matches
    pub async fn list<T>(&self, table: &str, q: &ListQuery) -> RepoResult<(Vec<T>, u64)>
    where
        T: DeserializeOwned,
    {
        let where_clause = q.where_clause();
        let sql = format!(
            "SELECT count() AS total FROM {table}{where_clause} GROUP ALL; \
             SELECT * FROM {table}{where_clause} ORDER BY {} LIMIT {} START {}",
            q.order_by, q.limit, q.offset
        );

        let mut qb = self.db.query(&sql);
        for (i, (_, value)) in q.filters.iter().enumerate() {
            qb = qb.bind((format!("f{i}"), value.clone()));
        }
        if let Some((_, term)) = &q.search {
            qb = qb.bind(("q", term.clone()));
        }

        let mut result = qb.await?;
        let count: Vec<CountResult> = result.take(0)?;
        let total = count.first().map(|c| c.total).unwrap_or(0);
        let rows: Vec<T> = result.take(1)?;
        Ok((rows, total))
    }

    pub async fn select_all<T>(&self, table: &str) -> RepoResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<T> = self.db.select(table).await?;
        Ok(rows)
    }

    pub async fn find<T>(&self, table: &str, id: &str) -> RepoResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let row: Option<T> = self.db.select(record_id(table, id)).await?;
        Ok(row)
    }

    pub async fn insert<T>(&self, table: &str, data: T) -> RepoResult<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let created: Option<T> = self.db.create(table).content(data).await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create {table} record")))
    }

    /// Replace the stored document; `data` must not carry an `id`
    pub async fn replace<T>(&self, id: RecordId, data: T) -> RepoResult<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let missing = RepoError::NotFound(format!("Record {id} not found"));
        let mut result = self
            .db
            .query("UPDATE $id CONTENT $data")
            .bind(("id", id))
            .bind(("data", data))
            .await?;
        let rows: Vec<T> = result.take(0)?;
        rows.into_iter().next().ok_or(missing)
    }

    /// Hard delete; `false` when nothing was stored under `id`
    pub async fn remove<T>(&self, table: &str, id: &str) -> RepoResult<bool>
    where
        T: DeserializeOwned,
    {
        let deleted: Option<T> = self.db.delete(record_id(table, id)).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MaintenanceStatus;

    #[test]
    fn test_record_id_accepts_both_forms() {
        assert_eq!(record_id("tenant", "tenant:abc").to_string(), "tenant:abc");
        assert_eq!(record_id("tenant", "abc").to_string(), "tenant:abc");
        assert_eq!(record_id("tenant", "abc").table(), "tenant");
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name(&MaintenanceStatus::InProgress), "in-progress");
    }

    #[test]
    fn test_where_clause_binds_values() {
        let q = ListQuery::new(10, 0)
            .filter("status", Some("active".into()))
            .filter("priority", None)
            .filter("type", Some("plumbing".into()))
            .search(&["name", "phone"], Some("  Ana "));
        assert_eq!(
            q.where_clause(),
            " WHERE status = $f0 AND `type` = $f1 AND \
             (string::contains(string::lowercase(name), $q) OR string::contains(string::lowercase(phone), $q))"
        );
    }

    #[test]
    fn test_sort_falls_back_to_default() {
        let q = ListQuery::new(10, 0).sort(&["name"], Some("password"), "createdAt", SortOrder::Desc);
        assert_eq!(q.order_by, "createdAt DESC");
        let q = ListQuery::new(10, 0).sort(&["name"], Some("name"), "createdAt", SortOrder::Asc);
        assert_eq!(q.order_by, "name ASC");
    }
}
