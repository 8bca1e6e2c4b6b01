//! Inventory API Handlers

use axum::extract::{Path, State};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;

use crate::api::extract::{AppJson, AppQuery};
use crate::core::ServerState;
use crate::db::models::{
    BulkUpdateRequest, BulkUpdateResult, ConditionRequest, InventoryCreate, InventoryItem,
    InventoryUpdate, InventoryView, MaintenanceScheduleRequest, StatusRequest,
};
use crate::db::repository::RepoResultExt;
use crate::db::repository::inventory::{InventoryFilter, InventoryRepository};
use crate::services::stats::{InventoryStats, inventory_stats};
use crate::utils::validation;
use shared::models::{
    Condition, InventoryCategory, InventoryStatus, empty_string_as_none, parse_enum,
};
use shared::{ApiResponse, AppError, AppResult, ErrorCode, PageQuery, Pagination, SortOrder};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<InventoryCategory>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<InventoryStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub condition: Option<Condition>,
    pub apartment_number: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_order: Option<SortOrder>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::InventoryItemNotFound)
}

fn views(items: Vec<InventoryItem>) -> Vec<InventoryView> {
    let now = Utc::now();
    items
        .into_iter()
        .map(|i| InventoryView::new(i, now))
        .collect()
}

/// GET /api/inventory
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<InventoryListQuery>,
) -> AppResult<ApiResponse<Vec<InventoryView>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let filter = InventoryFilter {
        category: query.category,
        status: query.status,
        condition: query.condition,
        apartment_number: query.apartment_number,
        sort_by: query.sort_by,
        sort_order: query.sort_order.unwrap_or_default(),
    };

    let (items, total) = state
        .inventory()
        .list(&filter, &page)
        .await
        .context("Error fetching inventory")?;

    Ok(ApiResponse::paginated(
        views(items),
        Pagination::from_query(&page, total),
    ))
}

/// GET /api/inventory/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<InventoryView>> {
    let item = state
        .inventory()
        .find_by_id(&id)
        .await
        .context("Error fetching inventory item")?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(InventoryView::new(item, Utc::now())))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<ServerState>,
    AppJson(mut payload): AppJson<InventoryCreate>,
) -> AppResult<(StatusCode, ApiResponse<InventoryView>)> {
    payload.normalize();
    payload.check()?;

    let now = Utc::now();
    let item = state
        .inventory()
        .create(payload.into_item(now))
        .await
        .context("Error creating inventory item")?;

    tracing::info!(
        item = ?item.id,
        apartment = %item.apartment_number,
        category = %item.category,
        "Inventory item created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(
            "Inventory item created successfully",
            InventoryView::new(item, now),
        ),
    ))
}

/// PUT /api/inventory/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<InventoryUpdate>,
) -> AppResult<ApiResponse<InventoryView>> {
    payload.normalize();
    payload.check()?;

    let repo = state.inventory();
    let mut item = repo
        .find_by_id(&id)
        .await
        .context("Error updating inventory item")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    payload.apply(&mut item, now);
    let saved = repo
        .save(&item)
        .await
        .context("Error updating inventory item")?;

    Ok(ApiResponse::success_with_message(
        "Inventory item updated successfully",
        InventoryView::new(saved, now),
    ))
}

/// DELETE /api/inventory/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let deleted = state
        .inventory()
        .delete(&id)
        .await
        .context("Error deleting inventory item")?;
    if !deleted {
        return Err(not_found());
    }
    Ok(ApiResponse::message_only("Inventory item deleted successfully"))
}

/// GET /api/inventory/category/{category}
pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<InventoryView>>> {
    let category: InventoryCategory = parse_enum(&category)
        .ok_or_else(|| AppError::validation(format!("Invalid category: {category}")))?;

    let (items, total) = state
        .inventory()
        .find_by_category(category, &page)
        .await
        .context("Error fetching inventory by category")?;

    Ok(ApiResponse::paginated(
        views(items),
        Pagination::from_query(&page, total),
    ))
}

/// GET /api/inventory/apartment/{apartment}
pub async fn by_apartment(
    State(state): State<ServerState>,
    Path(apartment): Path<String>,
) -> AppResult<ApiResponse<Vec<InventoryView>>> {
    let items = state
        .inventory()
        .find_by_apartment(&apartment)
        .await
        .context("Error fetching inventory by apartment")?;
    Ok(ApiResponse::success(views(items)))
}

/// GET /api/inventory/maintenance/due
pub async fn maintenance_due(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<InventoryView>>> {
    let items = state
        .inventory()
        .find_maintenance_due(Utc::now())
        .await
        .context("Error fetching maintenance due items")?;
    Ok(ApiResponse::success(views(items)))
}

/// PATCH /api/inventory/{id}/maintenance
pub async fn schedule_maintenance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<MaintenanceScheduleRequest>,
) -> AppResult<ApiResponse<InventoryView>> {
    validation::validate_payload(&payload)?;
    let next = payload
        .next_maintenance_date
        .ok_or_else(|| AppError::validation("Next maintenance date is required"))?;

    let repo = state.inventory();
    let mut item = repo
        .find_by_id(&id)
        .await
        .context("Error updating maintenance schedule")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    item.schedule_maintenance(next, now)?;
    let saved = repo
        .save(&item)
        .await
        .context("Error updating maintenance schedule")?;

    Ok(ApiResponse::success_with_message(
        "Maintenance schedule updated successfully",
        InventoryView::new(saved, now),
    ))
}

/// PATCH /api/inventory/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<StatusRequest>,
) -> AppResult<ApiResponse<InventoryView>> {
    validation::validate_payload(&payload)?;
    let status = payload
        .status
        .ok_or_else(|| AppError::validation("Status is required"))?;

    let repo = state.inventory();
    let mut item = repo
        .find_by_id(&id)
        .await
        .context("Error updating item status")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    item.set_status(status, now);
    let saved = repo.save(&item).await.context("Error updating item status")?;

    tracing::info!(item = %id, status = status.as_str(), "Inventory status changed");

    Ok(ApiResponse::success_with_message(
        "Item status updated successfully",
        InventoryView::new(saved, now),
    ))
}

/// PATCH /api/inventory/{id}/condition
pub async fn update_condition(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ConditionRequest>,
) -> AppResult<ApiResponse<InventoryView>> {
    validation::validate_payload(&payload)?;
    let condition = payload
        .condition
        .ok_or_else(|| AppError::validation("Condition is required"))?;

    let repo = state.inventory();
    let mut item = repo
        .find_by_id(&id)
        .await
        .context("Error updating item condition")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    item.set_condition(condition, now);
    let saved = repo
        .save(&item)
        .await
        .context("Error updating item condition")?;

    Ok(ApiResponse::success_with_message(
        "Item condition updated successfully",
        InventoryView::new(saved, now),
    ))
}

/// GET /api/inventory/stats/overview
pub async fn overview(State(state): State<ServerState>) -> AppResult<ApiResponse<InventoryStats>> {
    let items = state
        .inventory()
        .find_all()
        .await
        .context("Error fetching inventory statistics")?;
    Ok(ApiResponse::success(inventory_stats(&items, Utc::now())))
}

/// GET /api/inventory/search/{query}
pub async fn search(
    State(state): State<ServerState>,
    Path(query): Path<String>,
) -> AppResult<ApiResponse<Vec<InventoryView>>> {
    let items = state
        .inventory()
        .search(&query)
        .await
        .context("Error searching inventory")?;
    Ok(ApiResponse::success(views(items)))
}

/// POST /api/inventory/bulk-update
///
/// Entries are applied in order. A failing entry is reported in its result
/// and never aborts the rest of the batch.
pub async fn bulk_update(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<BulkUpdateRequest>,
) -> AppResult<ApiResponse<Vec<BulkUpdateResult>>> {
    if payload.items.is_empty() {
        return Err(AppError::validation("Items array is required"));
    }

    let repo = state.inventory();
    let now = Utc::now();
    let mut results = Vec::with_capacity(payload.items.len());

    for entry in payload.items {
        let outcome = apply_bulk_entry(&repo, &entry.id, entry.parse_updates(), now).await;
        results.push(match outcome {
            Ok(view) => BulkUpdateResult::ok(entry.id, view),
            Err(e) => {
                tracing::warn!(item = %entry.id, error = %e, "Bulk update entry failed");
                BulkUpdateResult::failed(entry.id, &e)
            }
        });
    }

    let failed = results.iter().filter(|r| !r.success).count();
    tracing::info!(total = results.len(), failed, "Bulk update completed");

    Ok(ApiResponse::success_with_message("Bulk update completed", results))
}

async fn apply_bulk_entry(
    repo: &InventoryRepository,
    id: &str,
    updates: AppResult<InventoryUpdate>,
    now: chrono::DateTime<Utc>,
) -> AppResult<InventoryView> {
    let updates = updates?;
    let mut item = repo
        .find_by_id(id)
        .await
        .context("Error in bulk update")?
        .ok_or_else(not_found)?;
    updates.apply(&mut item, now);
    let saved = repo.save(&item).await.context("Error in bulk update")?;
    Ok(InventoryView::new(saved, now))
}
