pub mod auth;
pub mod health;
pub mod jobs;
pub mod reports;
pub mod retention;
pub mod settings;
pub mod tracking;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket change feed
///
/// /track?reception_no=                             public lookup + timeline
///
/// /auth/login                                      login
/// /auth/me                                         current user
///
/// /jobs                                            list, create
/// /jobs/next-reception-no?department=              suggested reception number
/// /jobs/bulk/status                                bulk status update
/// /jobs/bulk/delete                                bulk delete
/// /jobs/{id}                                       detail, edit, delete
/// /jobs/{id}/status                                status update
/// /jobs/{id}/printed                               appointment slip printed
///
/// /settings                                        all settings documents
/// /settings/workflows/{department}                 replace workflow
/// /settings/workflows/{department}/steps           add step
/// /settings/workflows/{department}/steps/{step_id} rename, remove
/// /settings/workflows/{department}/steps/{step_id}/move   move up/down
/// /settings/departments/{department}               thresholds + officers
/// /settings/job-types/{department}                 job types
///
/// /dashboard/stats?department=                     dashboard counts
/// /reports/department?department=&start=&end=      department report
///
/// /retention                                       retention overview
/// /retention/purge                                 delete expired (admin)
///
/// /admin/users                                     list, create (admin)
/// /admin/users/{id}                                update, deactivate (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        // Public tracking page.
        .nest("/track", tracking::router())
        .nest("/auth", auth::router())
        .nest("/jobs", jobs::router())
        .nest("/settings", settings::router())
        .nest("/dashboard", reports::dashboard_router())
        .nest("/reports", reports::router())
        .nest("/retention", retention::router())
        .nest("/admin/users", users::router())
}
