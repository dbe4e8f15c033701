//! Route definitions for the `/settings` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /                                         -> get_settings
/// PUT    /workflows/{department}                   -> replace_workflow
/// POST   /workflows/{department}/steps             -> add_workflow_step
/// PUT    /workflows/{department}/steps/{step_id}   -> rename_workflow_step
/// DELETE /workflows/{department}/steps/{step_id}   -> remove_workflow_step
/// POST   /workflows/{department}/steps/{step_id}/move -> move_workflow_step
/// PUT    /departments/{department}                 -> update_department_settings
/// PUT    /job-types/{department}                   -> update_job_types
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::get_settings))
        .route("/workflows/{department}", put(settings::replace_workflow))
        .route(
            "/workflows/{department}/steps",
            post(settings::add_workflow_step),
        )
        .route(
            "/workflows/{department}/steps/{step_id}",
            put(settings::rename_workflow_step).delete(settings::remove_workflow_step),
        )
        .route(
            "/workflows/{department}/steps/{step_id}/move",
            post(settings::move_workflow_step),
        )
        .route(
            "/departments/{department}",
            put(settings::update_department_settings),
        )
        .route("/job-types/{department}", put(settings::update_job_types))
}
