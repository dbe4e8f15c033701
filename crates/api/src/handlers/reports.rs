//! Dashboard statistics and department workload reports.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use landtrack_core::department::validate_department;
use landtrack_core::report::{
    dashboard_stats, department_report, DashboardStats, DateRange, DepartmentReport,
};
use landtrack_core::sla::office_today;
use landtrack_core::store::{load_settings, JobStore};
use landtrack_core::types::CalendarDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DepartmentParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /reports/department`.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub department: Option<String>,
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

/// GET /api/v1/dashboard/stats?department=
///
/// Counts over the jobs the caller can see, optionally narrowed to one
/// department.
pub async fn get_dashboard_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DepartmentParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let mut filter = auth.job_filter();
    if let Some(department) = params.department.filter(|d| !d.is_empty()) {
        auth.ensure_access(&department)?;
        filter.department = Some(department);
    }

    let jobs = state.store.list_jobs(&filter).await?;
    Ok(Json(DataResponse {
        data: dashboard_stats(&jobs),
    }))
}

/// GET /api/v1/reports/department?department=&start=&end=
///
/// Workload of one department over an optional inclusive range of
/// reception dates.
pub async fn get_department_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<DepartmentReport>>> {
    let department = params
        .department
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::BadRequest("department is required".into()))?;
    validate_department(&department)?;
    auth.ensure_access(&department)?;

    let range = DateRange {
        start: params.start,
        end: params.end,
    };
    range.validate()?;

    let mut filter = auth.job_filter();
    filter.department = Some(department.clone());
    let jobs = state.store.list_jobs(&filter).await?;
    let settings = load_settings(state.store.as_ref()).await?;

    let report = department_report(
        &department,
        &jobs,
        range,
        &settings,
        office_today(Utc::now()),
    );
    Ok(Json(DataResponse { data: report }))
}
