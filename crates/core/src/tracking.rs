//! Public tracking: what a citizen sees after entering a reception number.

use serde::Serialize;

use crate::department::DEFAULT_OFFICER_NAME;
use crate::job::Job;
use crate::reception::same_reception_no;
use crate::settings::AppSettings;
use crate::status::JobStatus;
use crate::types::CalendarDate;
use crate::workflow::{build_timeline, StepState};

/// Step label for completed and active steps on the public page.
pub const STEP_DONE_LABEL: &str = "ดำเนินการแล้ว";

/// Step label for pending steps.
pub const STEP_PENDING_LABEL: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStep {
    pub id: i64,
    pub name: String,
    pub state: StepState,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingView {
    pub reception_no: String,
    pub date: CalendarDate,
    pub department: String,
    pub job_type: String,
    pub owner: String,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub step: Option<String>,
    pub responsible_officer: String,
    pub contact_phone: String,
    pub timeline: Vec<TrackingStep>,
}

/// Choose the job a lookup resolves to.
///
/// `candidates` are the case-insensitive substring matches in store order.
/// An exact (case-insensitive) match wins; otherwise the first candidate.
pub fn pick_match(candidates: Vec<Job>, reception_no: &str) -> Option<Job> {
    let exact = candidates
        .iter()
        .position(|j| same_reception_no(&j.reception_no, reception_no));
    match exact {
        Some(idx) => candidates.into_iter().nth(idx),
        None => candidates.into_iter().next(),
    }
}

impl TrackingView {
    pub fn build(job: &Job, settings: &AppSettings) -> Self {
        let workflow = settings.tracking_workflow_for(&job.department);
        let timeline = build_timeline(workflow, job.step.as_deref(), job.status)
            .into_iter()
            .map(|s| TrackingStep {
                label: if s.state == StepState::Pending {
                    STEP_PENDING_LABEL
                } else {
                    STEP_DONE_LABEL
                },
                id: s.id,
                name: s.name,
                state: s.state,
            })
            .collect();

        let officer = job.assignees.first().map(String::as_str);
        let contact_phone = settings
            .dept_settings_for(&job.department)
            .contact_phone(officer)
            .to_string();

        Self {
            reception_no: job.reception_no.clone(),
            date: job.date,
            department: job.department.clone(),
            job_type: job.job_type.clone(),
            owner: job.owner.clone(),
            status: job.status,
            status_label: job.status.label(),
            step: job.step.clone(),
            responsible_officer: officer.unwrap_or(DEFAULT_OFFICER_NAME).to_string(),
            contact_phone,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::department::{DEFAULT_CONTACT_PHONE, DEPT_LAND_TECHNICAL, DEPT_REGISTRATION};
    use crate::job::tests::sample_job;

    #[test]
    fn exact_match_preferred() {
        let mut a = sample_job(1, DEPT_REGISTRATION);
        a.reception_no = "R12/2568".into();
        let mut b = sample_job(2, DEPT_REGISTRATION);
        b.reception_no = "R1/2568".into();

        let picked = pick_match(vec![a.clone(), b], "r1/2568").unwrap();
        assert_eq!(picked.id, 2);

        let picked = pick_match(vec![a], "1").unwrap();
        assert_eq!(picked.id, 1);
        assert!(pick_match(Vec::new(), "x").is_none());
    }

    #[test]
    fn labels_follow_state() {
        let settings = AppSettings::default();
        let mut job = sample_job(1, DEPT_REGISTRATION);
        job.status = JobStatus::Active;
        job.step = Some("เสนอเจ้าพนักงานที่ดิน".into());

        let view = TrackingView::build(&job, &settings);
        let labels: Vec<_> = view.timeline.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![STEP_DONE_LABEL, STEP_DONE_LABEL, STEP_DONE_LABEL, "-", "-"]);
        assert_eq!(view.timeline[2].state, StepState::Active);
    }

    #[test]
    fn officer_and_phone_fallbacks() {
        let settings = AppSettings::default();

        let mut job = sample_job(1, DEPT_REGISTRATION);
        job.assignees = vec!["นางสาวคล่องแคล่ว ว่องไว".into()];
        let view = TrackingView::build(&job, &settings);
        assert_eq!(view.responsible_officer, "นางสาวคล่องแคล่ว ว่องไว");
        assert_eq!(view.contact_phone, "081-234-5678");

        let job = sample_job(2, DEPT_LAND_TECHNICAL);
        let view = TrackingView::build(&job, &settings);
        assert_eq!(view.responsible_officer, DEFAULT_OFFICER_NAME);
        assert_eq!(view.contact_phone, DEFAULT_CONTACT_PHONE);
    }

    #[test]
    fn department_without_workflow_uses_registration() {
        let mut settings = AppSettings::default();
        settings.workflows.remove(DEPT_LAND_TECHNICAL);
        let view = TrackingView::build(&sample_job(1, DEPT_LAND_TECHNICAL), &settings);
        assert_eq!(view.timeline.len(), 5);
        assert_eq!(view.timeline[0].name, "รับเรื่อง / ตรวจสอบเอกสาร");
    }
}
