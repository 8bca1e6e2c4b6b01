//! Dashboard and overview statistics
//!
//! Aggregates are computed over full record sets in memory. Money is summed
//! with [`shared::money`] so totals come out rounded to cents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::models::{InventoryItem, MaintenanceRequest, RecentTenant, Tenant};
use shared::lifecycle;
use shared::models::{InventoryCategory, MaintenanceStatus, Priority, TenantStatus};
use shared::money;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStats {
    pub total_tenants: usize,
    pub active_tenants: usize,
    pub total_revenue: f64,
    pub average_rent: f64,
}

/// Tenant stats plus the latest arrivals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(flatten)]
    pub stats: TenantStats,
    pub recent_tenants: Vec<RecentTenant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStats {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub in_progress_requests: usize,
    pub completed_requests: usize,
    pub urgent_requests: usize,
    pub total_cost: f64,
    pub overdue_requests: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: InventoryCategory,
    pub total_items: i64,
    pub total_value: f64,
    pub average_condition: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTotals {
    pub total_items: i64,
    pub total_value: f64,
    /// Mean age in days over items with a purchase date
    pub average_age: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub category_stats: Vec<CategoryStats>,
    pub total_stats: InventoryTotals,
}

/// Counts use the stored status; run a sync first for fresh numbers.
pub fn dashboard_stats(tenants: &[Tenant]) -> TenantStats {
    TenantStats {
        total_tenants: tenants.len(),
        active_tenants: tenants
            .iter()
            .filter(|t| t.status == TenantStatus::Active)
            .count(),
        total_revenue: money::sum(tenants.iter().map(|t| t.total_rent)),
        average_rent: money::mean(tenants.iter().map(|t| t.rent_amount)),
    }
}

pub fn maintenance_stats(requests: &[MaintenanceRequest], now: DateTime<Utc>) -> MaintenanceStats {
    let with_status = |s: MaintenanceStatus| requests.iter().filter(|r| r.status == s).count();
    MaintenanceStats {
        total_requests: requests.len(),
        pending_requests: with_status(MaintenanceStatus::Pending),
        in_progress_requests: with_status(MaintenanceStatus::InProgress),
        completed_requests: with_status(MaintenanceStatus::Completed),
        urgent_requests: requests
            .iter()
            .filter(|r| r.priority == Priority::Urgent)
            .count(),
        total_cost: money::sum(requests.iter().map(|r| r.actual_cost)),
        overdue_requests: requests
            .iter()
            .filter(|r| lifecycle::counts_as_overdue_request(r.status, r.reported_date, now))
            .count(),
    }
}

/// Per-category breakdown (categories in declaration order) and overall totals
pub fn inventory_stats(items: &[InventoryItem], now: DateTime<Utc>) -> InventoryStats {
    let mut groups: BTreeMap<InventoryCategory, Vec<&InventoryItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.category).or_default().push(item);
    }

    let category_stats = groups
        .into_iter()
        .map(|(category, group)| CategoryStats {
            category,
            total_items: group.iter().map(|i| i.count).sum(),
            total_value: money::sum(group.iter().map(|i| item_value(i))),
            average_condition: money::mean(group.iter().map(|i| f64::from(i.condition.score()))),
        })
        .collect();

    let total_stats = InventoryTotals {
        total_items: items.iter().map(|i| i.count).sum(),
        total_value: money::sum(items.iter().map(item_value)),
        average_age: money::mean(items.iter().filter_map(|i| i.age(now)).map(|d| d as f64)),
    };

    InventoryStats {
        category_stats,
        total_stats,
    }
}

fn item_value(item: &InventoryItem) -> f64 {
    money::times(item.purchase_price, item.count)
}
