//! Route definitions for dashboard statistics and reports.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /stats?department=   -> get_dashboard_stats
/// ```
pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(reports::get_dashboard_stats))
}

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /department?department=&start=&end=   -> get_department_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/department", get(reports::get_department_report))
}
