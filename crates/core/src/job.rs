//! Jobs: citizen applications tracked through a department workflow.
//!
//! The functions here validate and normalize edits; persistence happens
//! through [`crate::store::JobStore`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::department::validate_department;
use crate::error::CoreError;
use crate::reception;
use crate::sanitize::{
    require_text, sanitize_search_input, sanitize_text, MAX_NAME_LEN, MAX_NOTE_LEN,
    MAX_SEARCH_TERM_LEN,
};
use crate::settings::AppSettings;
use crate::sla::{classify, SlaClassification};
use crate::status::JobStatus;
use crate::types::{CalendarDate, DbId, Timestamp};
use crate::workflow::{
    build_timeline, initial_step_name, is_finish_request, last_step, TimelineStepView,
    WorkflowStep,
};

/// A stored job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: DbId,
    pub reception_no: String,
    /// Reception date; SLA days are counted from here.
    pub date: CalendarDate,
    pub department: String,
    pub job_type: String,
    pub owner: String,
    pub status: JobStatus,
    /// Name of the workflow step reached, matched by exact string equality.
    pub step: Option<String>,
    pub note: String,
    pub assignees: Vec<String>,
    pub completed_at: Option<Timestamp>,
    pub printed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated job ready to insert. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub reception_no: String,
    pub date: CalendarDate,
    pub department: String,
    pub job_type: String,
    pub owner: String,
    pub status: JobStatus,
    pub step: Option<String>,
    pub note: String,
    pub assignees: Vec<String>,
}

/// Request body for creating a job.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    /// Generated from the department prefix when blank or omitted.
    pub reception_no: Option<String>,
    /// Defaults to today at the office.
    pub date: Option<CalendarDate>,
    pub department: String,
    pub job_type: String,
    pub owner: String,
    pub note: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// Request body for editing a job's information. All fields are optional.
///
/// The department cannot change after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobInfo {
    pub reception_no: Option<String>,
    pub date: Option<CalendarDate>,
    pub job_type: Option<String>,
    pub owner: Option<String>,
    pub note: Option<String>,
    pub assignees: Option<Vec<String>>,
}

/// Requested status change. `step` of `None` leaves the step untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    pub step: Option<String>,
}

/// Trim, drop blanks and de-duplicate assignee names, keeping order.
pub fn clean_assignees(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| sanitize_text(n, MAX_NAME_LEN))
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

fn clean_name_field(field: &str, value: &str) -> Result<String, CoreError> {
    require_text(field, &sanitize_text(value, MAX_NAME_LEN), MAX_NAME_LEN)
}

fn clean_reception_no(raw: &str) -> Result<String, CoreError> {
    let cleaned = reception::sanitize(raw);
    reception::validate(&cleaned)?;
    Ok(cleaned)
}

impl CreateJob {
    /// Validate the request and fill defaults.
    ///
    /// `existing` holds every reception number already issued and is used
    /// both to generate the next number and to reject duplicates.
    pub fn into_new_job(
        self,
        settings: &AppSettings,
        today: CalendarDate,
        existing: &[String],
    ) -> Result<NewJob, CoreError> {
        validate_department(&self.department)?;

        let reception_no = match self.reception_no.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => clean_reception_no(raw)?,
            _ => reception::next_reception_no(
                &self.department,
                today,
                existing.iter().map(String::as_str),
            )?,
        };
        ensure_unique_reception_no(&reception_no, existing)?;

        let workflow = settings.workflow_for(&self.department);
        Ok(NewJob {
            reception_no,
            date: self.date.unwrap_or(today),
            job_type: clean_name_field("job_type", &self.job_type)?,
            owner: clean_name_field("owner", &self.owner)?,
            status: JobStatus::Pending,
            step: Some(initial_step_name(workflow).to_string()),
            note: self
                .note
                .map(|n| sanitize_text(&n, MAX_NOTE_LEN))
                .unwrap_or_default(),
            assignees: clean_assignees(&self.assignees),
            department: self.department,
        })
    }
}

/// Reject `reception_no` if any of `existing` equals it ignoring case.
pub fn ensure_unique_reception_no(reception_no: &str, existing: &[String]) -> Result<(), CoreError> {
    if existing
        .iter()
        .any(|no| reception::same_reception_no(no, reception_no))
    {
        return Err(CoreError::Conflict(format!(
            "Reception number '{reception_no}' already exists"
        )));
    }
    Ok(())
}

impl UpdateJobInfo {
    /// Apply the edit to `job`. `others` are the reception numbers of every
    /// other job, for the duplicate check.
    pub fn apply(&self, job: &mut Job, others: &[String]) -> Result<(), CoreError> {
        if let Some(raw) = &self.reception_no {
            let no = clean_reception_no(raw.trim())?;
            ensure_unique_reception_no(&no, others)?;
            job.reception_no = no;
        }
        if let Some(date) = self.date {
            job.date = date;
        }
        if let Some(job_type) = &self.job_type {
            job.job_type = clean_name_field("job_type", job_type)?;
        }
        if let Some(owner) = &self.owner {
            job.owner = clean_name_field("owner", owner)?;
        }
        if let Some(note) = &self.note {
            job.note = sanitize_text(note, MAX_NOTE_LEN);
        }
        if let Some(assignees) = &self.assignees {
            job.assignees = clean_assignees(assignees);
        }
        Ok(())
    }
}

/// Resolve finish requests at the edit boundary.
///
/// A step equal to the `COMPLETED` marker or the finished sentinel forces the
/// status to completed and moves the step to the last workflow step when the
/// workflow has one. Everything else passes through unchanged.
pub fn normalize_status_update(update: StatusUpdate, workflow: &[WorkflowStep]) -> StatusUpdate {
    match update.step.as_deref() {
        Some(step) if is_finish_request(step) => StatusUpdate {
            status: JobStatus::Completed,
            step: Some(
                last_step(workflow)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| step.to_string()),
            ),
        },
        _ => update,
    }
}

/// Apply an already normalized status update.
///
/// Entering `completed` stamps `completed_at`; leaving it clears it. Staying
/// completed keeps the original stamp.
pub fn apply_status(job: &mut Job, update: StatusUpdate, now: Timestamp) {
    match (job.status.is_completed(), update.status.is_completed()) {
        (false, true) => job.completed_at = Some(now),
        (true, false) => job.completed_at = None,
        _ => {}
    }
    job.status = update.status;
    if let Some(step) = update.step {
        job.step = Some(step);
    }
}

/// The step applied by a bulk update: only when all jobs share a department.
pub fn bulk_step<'a>(jobs: &[Job], step: Option<&'a str>) -> Option<&'a str> {
    let first = jobs.first()?;
    if jobs.iter().all(|j| j.department == first.department) {
        step
    } else {
        None
    }
}

pub fn mark_printed(job: &mut Job, now: Timestamp) {
    job.printed_at = Some(now);
}

/// A job counts as finished when it is completed and sits on the last step
/// of its department workflow. Finished jobs are exempt from SLA checks.
pub fn is_finished(job: &Job, workflow: &[WorkflowStep]) -> bool {
    job.status.is_completed()
        && matches!(
            (last_step(workflow), job.step.as_deref()),
            (Some(last), Some(step)) if last.name == step
        )
}

/// SLA classification of an unfinished job, `None` for finished ones.
pub fn classify_job(
    job: &Job,
    settings: &AppSettings,
    today: CalendarDate,
) -> Option<SlaClassification> {
    if is_finished(job, settings.workflow_for(&job.department)) {
        return None;
    }
    Some(classify(
        job.date,
        today,
        &settings.thresholds_for(&job.department),
    ))
}

/// Query filter for job listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Case-insensitive substring over reception number and owner.
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<JobStatus>,
    /// Departments the caller may see. `None` means all.
    pub scope: Option<Vec<String>>,
}

impl JobFilter {
    /// Sanitize the search term, dropping it when nothing is left.
    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .map(|t| sanitize_search_input(t, MAX_SEARCH_TERM_LEN))
            .filter(|t| !t.is_empty());
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if let Some(scope) = &self.scope {
            if !scope.iter().any(|d| d == &job.department) {
                return false;
            }
        }
        if let Some(dept) = &self.department {
            if &job.department != dept {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !job.reception_no.to_lowercase().contains(&term)
                && !job.owner.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// A job with its derived timeline and SLA classification.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub status_label: &'static str,
    pub timeline: Vec<TimelineStepView>,
    pub sla: Option<SlaClassification>,
}

impl JobDetail {
    pub fn build(job: Job, settings: &AppSettings, today: CalendarDate) -> Self {
        let timeline = build_timeline(
            settings.workflow_for(&job.department),
            job.step.as_deref(),
            job.status,
        );
        let sla = classify_job(&job, settings, today);
        Self {
            status_label: job.status.label(),
            timeline,
            sla,
            job,
        }
    }
}
