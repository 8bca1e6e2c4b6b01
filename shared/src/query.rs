//! List query parameters and pagination metadata

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound on page size
pub const MAX_LIMIT: u32 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SurrealQL keyword
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `page` / `limit` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// 1-based page number, never below 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

/// Pagination block of the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let limit = limit.max(1);
        Self {
            current_page: page,
            total_pages: total_items.div_ceil(u64::from(limit)) as u32,
            total_items,
            items_per_page: limit,
        }
    }

    pub fn from_query(query: &PageQuery, total_items: u64) -> Self {
        Self::new(query.page(), query.limit(), total_items)
    }
}
