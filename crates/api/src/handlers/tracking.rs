//! Public reception-number lookup. No authentication.

use axum::extract::{Query, State};
use axum::Json;
use landtrack_core::error::CoreError;
use landtrack_core::reception;
use landtrack_core::store::{load_settings, JobStore};
use landtrack_core::tracking::{pick_match, TrackingView};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackParams {
    pub reception_no: Option<String>,
}

/// GET /api/v1/track?reception_no=
///
/// Resolve a reception number to at most one job and return its public
/// timeline. An exact match (ignoring case) wins over substring matches.
pub async fn track(
    State(state): State<AppState>,
    Query(params): Query<TrackParams>,
) -> AppResult<Json<DataResponse<TrackingView>>> {
    let term = reception::sanitize(params.reception_no.as_deref().unwrap_or_default().trim());
    if term.is_empty() {
        return Err(CoreError::Validation("reception_no is required".into()).into());
    }

    let candidates = state.store.search_reception_no(&term).await?;
    let job = pick_match(candidates, &term).ok_or_else(|| CoreError::NotFoundKey {
        entity: "Job",
        key: term.clone(),
    })?;

    let settings = load_settings(state.store.as_ref()).await?;
    tracing::debug!(job_id = job.id, "Tracking lookup");

    Ok(Json(DataResponse {
        data: TrackingView::build(&job, &settings),
    }))
}
