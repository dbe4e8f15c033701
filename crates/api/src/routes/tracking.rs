//! Public tracking route. No authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::tracking;
use crate::state::AppState;

/// Routes mounted at `/track`.
///
/// ```text
/// GET /?reception_no=   -> track
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(tracking::track))
}
