//! Route definitions for the `/jobs` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                     -> list_jobs
/// POST   /                     -> create_job
/// GET    /next-reception-no    -> suggest_reception_no
/// POST   /bulk/status          -> bulk_update_status
/// POST   /bulk/delete          -> bulk_delete
/// GET    /{id}                 -> get_job
/// PUT    /{id}                 -> update_job
/// DELETE /{id}                 -> delete_job
/// PUT    /{id}/status          -> update_status
/// POST   /{id}/printed         -> mark_job_printed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/next-reception-no", get(jobs::suggest_reception_no))
        .route("/bulk/status", post(jobs::bulk_update_status))
        .route("/bulk/delete", post(jobs::bulk_delete))
        .route(
            "/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/{id}/status", put(jobs::update_status))
        .route("/{id}/printed", post(jobs::mark_job_printed))
}
