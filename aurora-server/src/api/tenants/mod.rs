//! Tenant API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/tenants | GET | Paginated list with search, status filter and sorting |
//! | /api/tenants | POST | Create a tenant |
//! | /api/tenants/{id} | GET / PUT / DELETE | Read, update, delete |
//! | /api/tenants/{id}/checkout | PATCH | Check a tenant out |
//! | /api/tenants/stats/dashboard | GET | Dashboard figures and recent tenants |
//! | /api/tenants/apartment/{apartmentNumber} | GET | Tenants of an apartment |
//! | /api/tenants/search/{query} | GET | Quick search |
//! | /api/tenants/update-statuses | PATCH | Re-derive every stored status |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tenants", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats/dashboard", get(handler::dashboard))
        .route("/update-statuses", patch(handler::update_statuses))
        .route("/apartment/{apartment}", get(handler::by_apartment))
        .route("/search/{query}", get(handler::search))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/checkout", patch(handler::checkout))
}
