//! Inventory API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/inventory | GET / POST | Filtered list, create |
//! | /api/inventory/{id} | GET / PUT / DELETE | Read, update, delete |
//! | /api/inventory/{id}/maintenance | PATCH | Book next maintenance |
//! | /api/inventory/{id}/status | PATCH | Change status |
//! | /api/inventory/{id}/condition | PATCH | Change condition |
//! | /api/inventory/category/{category} | GET | Items of a category, paginated |
//! | /api/inventory/apartment/{apartmentNumber} | GET | Items of an apartment |
//! | /api/inventory/maintenance/due | GET | Items due for maintenance |
//! | /api/inventory/stats/overview | GET | Per-category and overall totals |
//! | /api/inventory/search/{query} | GET | Quick search |
//! | /api/inventory/bulk-update | POST | Apply updates item by item |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats/overview", get(handler::overview))
        .route("/maintenance/due", get(handler::maintenance_due))
        .route("/category/{category}", get(handler::by_category))
        .route("/apartment/{apartment}", get(handler::by_apartment))
        .route("/search/{query}", get(handler::search))
        .route("/bulk-update", post(handler::bulk_update))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/maintenance", patch(handler::schedule_maintenance))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/condition", patch(handler::update_condition))
}
