//! Handlers for the `/settings` resource: workflows, department settings
//! and job types.
//!
//! Reading requires any authenticated user. Editing a department's settings
//! requires admin or membership of that department.

use axum::extract::{Path, State};
use axum::Json;
use landtrack_core::department::{validate_department, DeptSettings};
use landtrack_core::error::CoreError;
use landtrack_core::settings::{AppSettings, SettingKey};
use landtrack_core::store::{load_settings, save_setting};
use landtrack_core::workflow::editor::{
    add_step, move_step, normalize_job_types, remove_step, rename_step, validate_workflow,
    MoveDirection,
};
use landtrack_core::workflow::WorkflowStep;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StepNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveStepRequest {
    pub direction: MoveDirection,
}

fn authorize_edit(auth: &AuthUser, department: &str) -> Result<(), CoreError> {
    validate_department(department)?;
    auth.ensure_access(department)
}

/// Load settings, run `edit` on one department workflow, and store the
/// result, holding the settings write lock throughout. Returns the department's new step list.
async fn edit_workflow(
    state: &AppState,
    auth: &AuthUser,
    department: &str,
    edit: impl FnOnce(&[WorkflowStep]) -> Result<Vec<WorkflowStep>, CoreError>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    authorize_edit(auth, department)?;

    let _write = state.settings_write.lock().await;
    let mut settings = load_settings(state.store.as_ref()).await?;
    let steps = edit(settings.workflow_for(department))?;
    settings
        .workflows
        .insert(department.to_string(), steps.clone());
    save_setting(state.store.as_ref(), SettingKey::Workflows, &settings.workflows).await?;

    tracing::info!(
        department,
        steps = steps.len(),
        user_id = auth.user_id,
        "Workflow updated",
    );

    Ok(Json(DataResponse { data: steps }))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/settings
///
/// Every settings document, with built-in defaults for missing ones.
pub async fn get_settings(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AppSettings>>> {
    let settings = load_settings(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: settings }))
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

/// PUT /api/v1/settings/workflows/{department}
pub async fn replace_workflow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(steps): Json<Vec<WorkflowStep>>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    edit_workflow(&state, &auth, &department, |_| {
        validate_workflow(&steps)?;
        Ok(steps
            .into_iter()
            .map(|s| WorkflowStep::new(s.id, s.name.trim()))
            .collect())
    })
    .await
}

/// POST /api/v1/settings/workflows/{department}/steps
pub async fn add_workflow_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(input): Json<StepNameRequest>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    edit_workflow(&state, &auth, &department, |steps| add_step(steps, &input.name)).await
}

/// PUT /api/v1/settings/workflows/{department}/steps/{step_id}
pub async fn rename_workflow_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((department, step_id)): Path<(String, i64)>,
    Json(input): Json<StepNameRequest>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    edit_workflow(&state, &auth, &department, |steps| {
        rename_step(steps, step_id, &input.name)
    })
    .await
}

/// DELETE /api/v1/settings/workflows/{department}/steps/{step_id}
pub async fn remove_workflow_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((department, step_id)): Path<(String, i64)>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    edit_workflow(&state, &auth, &department, |steps| remove_step(steps, step_id)).await
}

/// POST /api/v1/settings/workflows/{department}/steps/{step_id}/move
pub async fn move_workflow_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((department, step_id)): Path<(String, i64)>,
    Json(input): Json<MoveStepRequest>,
) -> AppResult<Json<DataResponse<Vec<WorkflowStep>>>> {
    edit_workflow(&state, &auth, &department, |steps| {
        move_step(steps, step_id, input.direction)
    })
    .await
}

// ---------------------------------------------------------------------------
// Department settings and job types
// ---------------------------------------------------------------------------

/// PUT /api/v1/settings/departments/{department}
///
/// Replace SLA thresholds and the officer roster.
pub async fn update_department_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(input): Json<DeptSettings>,
) -> AppResult<Json<DataResponse<DeptSettings>>> {
    authorize_edit(&auth, &department)?;
    input.validate()?;

    let _write = state.settings_write.lock().await;
    let mut settings = load_settings(state.store.as_ref()).await?;
    settings
        .dept_settings
        .insert(department.clone(), input.clone());
    save_setting(
        state.store.as_ref(),
        SettingKey::DeptSettings,
        &settings.dept_settings,
    )
    .await?;

    tracing::info!(
        department = %department,
        warning_days = input.warning_days,
        critical_days = input.critical_days,
        "Department settings updated",
    );

    Ok(Json(DataResponse { data: input }))
}

/// PUT /api/v1/settings/job-types/{department}
pub async fn update_job_types(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(department): Path<String>,
    Json(input): Json<Vec<String>>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    authorize_edit(&auth, &department)?;

    let types = normalize_job_types(&input);
    let _write = state.settings_write.lock().await;
    let mut settings = load_settings(state.store.as_ref()).await?;
    settings.job_types.insert(department.clone(), types.clone());
    save_setting(state.store.as_ref(), SettingKey::JobTypes, &settings.job_types).await?;

    tracing::info!(department = %department, count = types.len(), "Job types updated");

    Ok(Json(DataResponse { data: types }))
}
