//! Handlers for the `/jobs` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Staff only reach
//! jobs of their own departments; admins reach every job.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use landtrack_core::department::validate_department;
use landtrack_core::error::CoreError;
use landtrack_core::job::{
    apply_status, bulk_step, mark_printed, normalize_status_update, CreateJob, Job, JobDetail,
    StatusUpdate, UpdateJobInfo,
};
use landtrack_core::reception::next_reception_no;
use landtrack_core::sla::office_today;
use landtrack_core::status::JobStatus;
use landtrack_core::store::{load_settings, JobStore, Store};
use landtrack_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DepartmentParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /jobs`.
#[derive(Debug, Deserialize)]
pub struct JobListParams {
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
}

/// Request body for `POST /jobs/bulk/status`.
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<DbId>,
    pub status: JobStatus,
    pub step: Option<String>,
}

/// Request body for `POST /jobs/bulk/delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct BulkResult {
    /// Number of jobs changed.
    pub affected: u64,
    /// Whether the requested step was applied (bulk status only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_applied: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct NextReceptionNo {
    pub department: String,
    pub reception_no: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a job by ID and verify the caller may touch its department.
async fn find_and_authorize(store: &dyn Store, job_id: DbId, auth: &AuthUser) -> AppResult<Job> {
    let job = store.find_job(job_id).await?.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Job",
        id: job_id,
    }))?;
    auth.ensure_access(&job.department)?;
    Ok(job)
}

/// Fetch every listed job, rejecting the batch if any is out of reach.
async fn find_many_and_authorize(
    store: &dyn Store,
    ids: &[DbId],
    auth: &AuthUser,
) -> AppResult<Vec<Job>> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }
    let jobs = store.find_jobs(ids).await?;
    for job in &jobs {
        auth.ensure_access(&job.department)?;
    }
    Ok(jobs)
}

// ---------------------------------------------------------------------------
// List / create
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs?search=&department=&status=
///
/// Newest first. Staff see only their departments.
pub async fn list_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(JobStatus::from_str)
        .transpose()?;

    let mut filter = auth.job_filter().with_search(params.search.as_deref());
    filter.department = params.department.filter(|d| !d.is_empty());
    filter.status = status;

    let jobs = state.store.list_jobs(&filter).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// POST /api/v1/jobs
///
/// Create a job in the first step of its department workflow. A blank
/// reception number is generated. Returns 201.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    validate_department(&input.department)?;
    auth.ensure_access(&input.department)?;

    let settings = load_settings(state.store.as_ref()).await?;
    let existing = state.store.reception_numbers(None).await?;
    let today = office_today(Utc::now());

    let new_job = input.into_new_job(&settings, today, &existing)?;
    let job = state.store.create_job(new_job).await?;

    tracing::info!(
        job_id = job.id,
        reception_no = %job.reception_no,
        user_id = auth.user_id,
        "Job submitted",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs/next-reception-no?department=
///
/// Suggest the next free reception number for a department.
pub async fn suggest_reception_no(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DepartmentParams>,
) -> AppResult<impl IntoResponse> {
    let department = params
        .department
        .ok_or_else(|| AppError::BadRequest("department is required".into()))?;
    validate_department(&department)?;
    auth.ensure_access(&department)?;

    let existing = state.store.reception_numbers(None).await?;
    let reception_no = next_reception_no(
        &department,
        office_today(Utc::now()),
        existing.iter().map(String::as_str),
    )?;

    Ok(Json(DataResponse {
        data: NextReceptionNo {
            department,
            reception_no,
        },
    }))
}

// ---------------------------------------------------------------------------
// Single job
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// The job with its workflow timeline and SLA classification.
pub async fn get_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = find_and_authorize(state.store.as_ref(), job_id, &auth).await?;
    let settings = load_settings(state.store.as_ref()).await?;
    let detail = JobDetail::build(job, &settings, office_today(Utc::now()));
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/jobs/{id}
///
/// Edit reception number, date, job type, owner, note or assignees.
pub async fn update_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<UpdateJobInfo>,
) -> AppResult<impl IntoResponse> {
    let mut job = find_and_authorize(state.store.as_ref(), job_id, &auth).await?;
    let others = state.store.reception_numbers(Some(job_id)).await?;
    input.apply(&mut job, &others)?;

    let job = state.store.update_job(&job).await?;
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{id}
///
/// Returns 204 on success.
pub async fn delete_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_and_authorize(state.store.as_ref(), job_id, &auth).await?;
    state.store.delete_jobs(&[job_id]).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/jobs/{id}/status
///
/// Set status and optionally step. A finish request (`COMPLETED` marker or
/// the finished sentinel) completes the job on the last workflow step.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    let mut job = find_and_authorize(state.store.as_ref(), job_id, &auth).await?;
    let settings = load_settings(state.store.as_ref()).await?;

    let update = normalize_status_update(input, settings.workflow_for(&job.department));
    apply_status(&mut job, update, Utc::now());
    let job = state.store.update_job(&job).await?;

    tracing::info!(
        job_id = job.id,
        status = %job.status,
        step = job.step.as_deref().unwrap_or_default(),
        "Job status updated",
    );

    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/jobs/{id}/printed
///
/// Record that the appointment slip was printed.
pub async fn mark_job_printed(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut job = find_and_authorize(state.store.as_ref(), job_id, &auth).await?;
    mark_printed(&mut job, Utc::now());
    let job = state.store.update_job(&job).await?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/bulk/status
///
/// Apply one status to many jobs. The step is applied only when every
/// selected job belongs to the same department.
pub async fn bulk_update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let jobs = find_many_and_authorize(state.store.as_ref(), &input.ids, &auth).await?;
    let settings = load_settings(state.store.as_ref()).await?;
    let step = bulk_step(&jobs, input.step.as_deref()).map(str::to_string);
    let step_applied = input.step.is_none() || step.is_some();
    let now = Utc::now();

    let mut affected = 0;
    for mut job in jobs {
        let update = normalize_status_update(
            StatusUpdate {
                status: input.status,
                step: step.clone(),
            },
            settings.workflow_for(&job.department),
        );
        apply_status(&mut job, update, now);
        state.store.update_job(&job).await?;
        affected += 1;
    }

    tracing::info!(affected, status = %input.status, step_applied, "Bulk status update");

    Ok(Json(DataResponse {
        data: BulkResult {
            affected,
            step_applied: Some(step_applied),
        },
    }))
}

/// POST /api/v1/jobs/bulk/delete
pub async fn bulk_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    let jobs = find_many_and_authorize(state.store.as_ref(), &input.ids, &auth).await?;
    let ids: Vec<DbId> = jobs.iter().map(|j| j.id).collect();
    let affected = state.store.delete_jobs(&ids).await?;

    Ok(Json(DataResponse {
        data: BulkResult {
            affected,
            step_applied: None,
        },
    }))
}
