//! Maintenance API Handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;

use crate::api::extract::{AppJson, AppQuery, optional_json};
use crate::core::ServerState;
use crate::db::models::{
    AssignRequest, CompleteRequest, MaintenanceCreate, MaintenanceRequest, MaintenanceUpdate,
    MaintenanceView,
};
use crate::db::repository::RepoResultExt;
use crate::db::repository::maintenance::MaintenanceFilter;
use crate::services::stats::{MaintenanceStats, maintenance_stats};
use crate::utils::validation;
use shared::models::{MaintenanceStatus, MaintenanceType, Priority, empty_string_as_none};
use shared::{ApiResponse, AppError, AppResult, ErrorCode, PageQuery, Pagination, SortOrder};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<MaintenanceStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub priority: Option<Priority>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub kind: Option<MaintenanceType>,
    pub apartment_number: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort_order: Option<SortOrder>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::MaintenanceNotFound)
}

fn views(requests: Vec<MaintenanceRequest>) -> Vec<MaintenanceView> {
    let now = Utc::now();
    requests
        .into_iter()
        .map(|r| MaintenanceView::new(r, now))
        .collect()
}

/// GET /api/maintenance
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<MaintenanceListQuery>,
) -> AppResult<ApiResponse<Vec<MaintenanceView>>> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let filter = MaintenanceFilter {
        status: query.status,
        priority: query.priority,
        kind: query.kind,
        apartment_number: query.apartment_number,
        sort_by: query.sort_by,
        sort_order: query.sort_order.unwrap_or_default(),
    };

    let (requests, total) = state
        .maintenance()
        .list(&filter, &page)
        .await
        .context("Error fetching maintenance requests")?;

    Ok(ApiResponse::paginated(
        views(requests),
        Pagination::from_query(&page, total),
    ))
}

/// GET /api/maintenance/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MaintenanceView>> {
    let request = state
        .maintenance()
        .find_by_id(&id)
        .await
        .context("Error fetching maintenance request")?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(MaintenanceView::new(request, Utc::now())))
}

/// POST /api/maintenance
pub async fn create(
    State(state): State<ServerState>,
    AppJson(mut payload): AppJson<MaintenanceCreate>,
) -> AppResult<(StatusCode, ApiResponse<MaintenanceView>)> {
    payload.normalize();
    payload.check()?;

    let now = Utc::now();
    let request = state
        .maintenance()
        .create(payload.into_request(now))
        .await
        .context("Error creating maintenance request")?;

    tracing::info!(
        request = ?request.id,
        apartment = %request.apartment_number,
        priority = ?request.priority,
        "Maintenance request created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(
            "Maintenance request created successfully",
            MaintenanceView::new(request, now),
        ),
    ))
}

/// PUT /api/maintenance/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<MaintenanceUpdate>,
) -> AppResult<ApiResponse<MaintenanceView>> {
    payload.normalize();
    payload.check()?;

    let repo = state.maintenance();
    let mut request = repo
        .find_by_id(&id)
        .await
        .context("Error updating maintenance request")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    payload.apply(&mut request, now);
    let saved = repo
        .save(&request)
        .await
        .context("Error updating maintenance request")?;

    Ok(ApiResponse::success_with_message(
        "Maintenance request updated successfully",
        MaintenanceView::new(saved, now),
    ))
}

/// DELETE /api/maintenance/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let deleted = state
        .maintenance()
        .delete(&id)
        .await
        .context("Error deleting maintenance request")?;
    if !deleted {
        return Err(not_found());
    }
    Ok(ApiResponse::message_only(
        "Maintenance request deleted successfully",
    ))
}

/// PATCH /api/maintenance/{id}/complete
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<ApiResponse<MaintenanceView>> {
    let completion: CompleteRequest = optional_json(&body)?;
    validation::validate_payload(&completion)?;

    let repo = state.maintenance();
    let mut request = repo
        .find_by_id(&id)
        .await
        .context("Error completing maintenance request")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    request.complete(completion, now)?;
    let saved = repo
        .save(&request)
        .await
        .context("Error completing maintenance request")?;

    Ok(ApiResponse::success_with_message(
        "Maintenance request marked as completed",
        MaintenanceView::new(saved, now),
    ))
}

/// PATCH /api/maintenance/{id}/assign
pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AssignRequest>,
) -> AppResult<ApiResponse<MaintenanceView>> {
    let assignee = payload.into_assignee()?;

    let repo = state.maintenance();
    let mut request = repo
        .find_by_id(&id)
        .await
        .context("Error assigning maintenance request")?
        .ok_or_else(not_found)?;

    let now = Utc::now();
    request.assign(assignee, now)?;
    let saved = repo
        .save(&request)
        .await
        .context("Error assigning maintenance request")?;

    Ok(ApiResponse::success_with_message(
        "Maintenance request assigned successfully",
        MaintenanceView::new(saved, now),
    ))
}

/// GET /api/maintenance/stats/overview
pub async fn overview(State(state): State<ServerState>) -> AppResult<ApiResponse<MaintenanceStats>> {
    let requests = state
        .maintenance()
        .find_all()
        .await
        .context("Error fetching maintenance statistics")?;
    Ok(ApiResponse::success(maintenance_stats(&requests, Utc::now())))
}

/// GET /api/maintenance/apartment/{apartment}
pub async fn by_apartment(
    State(state): State<ServerState>,
    Path(apartment): Path<String>,
) -> AppResult<ApiResponse<Vec<MaintenanceView>>> {
    let requests = state
        .maintenance()
        .find_by_apartment(&apartment)
        .await
        .context("Error fetching maintenance requests by apartment")?;
    Ok(ApiResponse::success(views(requests)))
}

/// GET /api/maintenance/status/pending
pub async fn pending(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<MaintenanceView>>> {
    let requests = state
        .maintenance()
        .find_pending()
        .await
        .context("Error fetching pending maintenance requests")?;
    Ok(ApiResponse::success(views(requests)))
}

/// GET /api/maintenance/status/completed
pub async fn completed(
    State(state): State<ServerState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<MaintenanceView>>> {
    let (requests, total) = state
        .maintenance()
        .find_completed(&page)
        .await
        .context("Error fetching completed maintenance requests")?;
    Ok(ApiResponse::paginated(
        views(requests),
        Pagination::from_query(&page, total),
    ))
}

/// GET /api/maintenance/priority/urgent
pub async fn urgent(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<Vec<MaintenanceView>>> {
    let requests = state
        .maintenance()
        .find_urgent()
        .await
        .context("Error fetching urgent maintenance requests")?;
    Ok(ApiResponse::success(views(requests)))
}
