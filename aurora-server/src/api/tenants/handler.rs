//! Tenant API Handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;

use crate::api::extract::{AppJson, AppQuery, optional_json};
use crate::core::ServerState;
use crate::db::models::{CheckoutRequest, TenantCreate, TenantUpdate, TenantView};
use crate::db::repository::RepoResultExt;
use crate::db::repository::tenant::TenantFilter;
use crate::services::lifecycle::{SyncReport, synchronize_all};
use crate::services::stats::{DashboardStats, dashboard_stats};
use shared::models::{TenantStatus, empty_string_as_none};
use shared::{ApiResponse, AppError, AppResult, ErrorCode, PageQuery, Pagination, SortOrder};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<TenantStatus>,
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_order: Option<SortOrder>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::TenantNotFound)
}

/// Bring stored statuses up to date before a read when configured to
async fn sync_before_read(state: &ServerState) {
    if !state.config.sync_on_read {
        return;
    }
    if let Err(e) =
        synchronize_all(&state.tenants(), Utc::now(), state.config.sync_concurrency).await
    {
        tracing::warn!(error = %e, "Status sync before read failed; serving stored statuses");
    }
}

/// GET /api/tenants
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<TenantListQuery>,
) -> AppResult<ApiResponse<Vec<TenantView>>> {
    sync_before_read(&state).await;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let filter = TenantFilter {
        search: query.search,
        status: query.status,
        sort_by: query.sort_by,
        sort_order: query.sort_order.unwrap_or_default(),
    };

    let (tenants, total) = state
        .tenants()
        .list(&filter, &page)
        .await
        .context("Error fetching tenants")?;

    let now = Utc::now();
    let views = tenants.into_iter().map(|t| TenantView::new(t, now)).collect();
    Ok(ApiResponse::paginated(views, Pagination::from_query(&page, total)))
}

/// GET /api/tenants/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TenantView>> {
    let tenant = state
        .tenants()
        .find_by_id(&id)
        .await
        .context("Error fetching tenant")?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(TenantView::new(tenant, Utc::now())))
}

/// POST /api/tenants
pub async fn create(
    State(state): State<ServerState>,
    AppJson(mut payload): AppJson<TenantCreate>,
) -> AppResult<(StatusCode, ApiResponse<TenantView>)> {
    payload.normalize();
    payload.check()?;

    let now = Utc::now();
    let tenant = state
        .tenants()
        .create(payload.into_tenant(now))
        .await
        .context("Error creating tenant")?;

    tracing::info!(
        tenant = ?tenant.id,
        apartment = %tenant.apartment_number,
        status = %tenant.status,
        "Tenant created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Tenant created successfully", TenantView::new(tenant, now)),
    ))
}

/// PUT /api/tenants/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<TenantUpdate>,
) -> AppResult<ApiResponse<TenantView>> {
    payload.normalize();
    payload.check()?;

    let repo = state.tenants();
    let mut tenant = repo
        .find_by_id(&id)
        .await
        .context("Error updating tenant")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    payload.apply(&mut tenant, now)?;
    let saved = repo.save(&tenant).await.context("Error updating tenant")?;

    Ok(ApiResponse::success_with_message(
        "Tenant updated successfully",
        TenantView::new(saved, now),
    ))
}

/// DELETE /api/tenants/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let deleted = state
        .tenants()
        .delete(&id)
        .await
        .context("Error deleting tenant")?;
    if !deleted {
        return Err(not_found());
    }
    tracing::info!(tenant = %id, "Tenant deleted");
    Ok(ApiResponse::message_only("Tenant deleted successfully"))
}

/// PATCH /api/tenants/{id}/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<TenantView>> {
    let request: CheckoutRequest = optional_json(&body)?;

    let repo = state.tenants();
    let mut tenant = repo
        .find_by_id(&id)
        .await
        .context("Error checking out tenant")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    tenant.checkout(request.checkout_date.unwrap_or(now), now)?;
    let saved = repo
        .save(&tenant)
        .await
        .context("Error checking out tenant")?;

    Ok(ApiResponse::success_with_message(
        "Tenant checked out successfully",
        TenantView::new(saved, now),
    ))
}

/// GET /api/tenants/stats/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<ApiResponse<DashboardStats>> {
    sync_before_read(&state).await;

    let repo = state.tenants();
    let tenants = repo
        .find_all()
        .await
        .context("Error fetching dashboard statistics")?;
    let recent_tenants = repo
        .recent()
        .await
        .context("Error fetching dashboard statistics")?;

    Ok(ApiResponse::success(DashboardStats {
        stats: dashboard_stats(&tenants),
        recent_tenants,
    }))
}

/// GET /api/tenants/apartment/{apartment}
pub async fn by_apartment(
    State(state): State<ServerState>,
    Path(apartment): Path<String>,
) -> AppResult<ApiResponse<Vec<TenantView>>> {
    let tenants = state
        .tenants()
        .find_by_apartment(&apartment)
        .await
        .context("Error fetching tenants by apartment")?;
    let now = Utc::now();
    Ok(ApiResponse::success(
        tenants.into_iter().map(|t| TenantView::new(t, now)).collect(),
    ))
}

/// GET /api/tenants/search/{query}
pub async fn search(
    State(state): State<ServerState>,
    Path(query): Path<String>,
) -> AppResult<ApiResponse<Vec<TenantView>>> {
    let tenants = state
        .tenants()
        .search(&query)
        .await
        .context("Error searching tenants")?;
    let now = Utc::now();
    Ok(ApiResponse::success(
        tenants.into_iter().map(|t| TenantView::new(t, now)).collect(),
    ))
}

/// PATCH /api/tenants/update-statuses
pub async fn update_statuses(State(state): State<ServerState>) -> AppResult<ApiResponse<SyncReport>> {
    let report = synchronize_all(&state.tenants(), Utc::now(), state.config.sync_concurrency)
        .await
        .context("Error updating tenant statuses")?;
    Ok(ApiResponse::success_with_message(
        format!("Updated {} tenant statuses", report.updated),
        report,
    ))
}
