//! Maintenance API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/maintenance | GET / POST | Filtered list, create |
//! | /api/maintenance/{id} | GET / PUT / DELETE | Read, update, delete |
//! | /api/maintenance/{id}/complete | PATCH | Mark completed |
//! | /api/maintenance/{id}/assign | PATCH | Assign and start work |
//! | /api/maintenance/stats/overview | GET | Counts, cost, overdue |
//! | /api/maintenance/apartment/{apartmentNumber} | GET | Requests of an apartment |
//! | /api/maintenance/status/pending | GET | Pending queue by priority |
//! | /api/maintenance/status/completed | GET | Completed, paginated |
//! | /api/maintenance/priority/urgent | GET | Open urgent requests |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/maintenance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats/overview", get(handler::overview))
        .route("/apartment/{apartment}", get(handler::by_apartment))
        .route("/status/pending", get(handler::pending))
        .route("/status/completed", get(handler::completed))
        .route("/priority/urgent", get(handler::urgent))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/complete", patch(handler::complete))
        .route("/{id}/assign", patch(handler::assign))
}
