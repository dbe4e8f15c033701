//! Retention of completed jobs.
//!
//! Completed jobs are kept for a fixed period after completion. Purging is an
//! explicit admin action; nothing deletes jobs on a timer.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use landtrack_core::retention::{expired_job_ids, retention_overview, RetentionOverview};
use landtrack_core::status::JobStatus;
use landtrack_core::store::JobStore;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PurgeResult {
    pub deleted: u64,
}

/// GET /api/v1/retention
///
/// Completed jobs the caller can see, soonest deletion first.
pub async fn get_retention(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RetentionOverview>>> {
    let mut filter = auth.job_filter();
    filter.status = Some(JobStatus::Completed);
    let jobs = state.store.list_jobs(&filter).await?;

    Ok(Json(DataResponse {
        data: retention_overview(&jobs, Utc::now()),
    }))
}

/// POST /api/v1/retention/purge
///
/// Delete every completed job whose retention period has run out. Admin only.
pub async fn purge_expired(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PurgeResult>>> {
    let mut filter = admin.job_filter();
    filter.status = Some(JobStatus::Completed);
    let jobs = state.store.list_jobs(&filter).await?;

    let expired = expired_job_ids(&jobs, Utc::now());
    let deleted = if expired.is_empty() {
        0
    } else {
        state.store.delete_jobs(&expired).await?
    };

    tracing::info!(deleted, user_id = admin.user_id, "Expired jobs purged");

    Ok(Json(DataResponse {
        data: PurgeResult { deleted },
    }))
}
