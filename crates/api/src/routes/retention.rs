use axum::routing::{get, post};
use axum::Router;

use crate::handlers::retention;
use crate::state::AppState;

/// Routes mounted at `/retention`.
///
/// ```text
/// GET  /        -> get_retention
/// POST /purge   -> purge_expired (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(retention::get_retention))
        .route("/purge", post(retention::purge_expired))
}
