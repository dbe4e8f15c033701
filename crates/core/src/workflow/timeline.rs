//! Timeline derivation from a job's current step.

use serde::{Deserialize, Serialize};

use super::{step_index, WorkflowStep};
use crate::status::JobStatus;

/// Progress of a single workflow step relative to a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// A workflow step annotated with its progress state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineStepView {
    pub id: i64,
    pub name: String,
    pub state: StepState,
}

/// Derive the progress state of every step in `workflow`.
///
/// A completed job has every step completed. Otherwise the first step whose
/// name equals `step` is active, earlier steps are completed, later steps are
/// pending. An absent or unmatched step leaves everything pending.
///
/// The result always reads `completed* active? pending*` left to right.
pub fn build_timeline(
    workflow: &[WorkflowStep],
    step: Option<&str>,
    status: JobStatus,
) -> Vec<TimelineStepView> {
    let current = if status.is_completed() {
        None
    } else {
        step.and_then(|name| step_index(workflow, name))
    };

    workflow
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let state = if status.is_completed() {
                StepState::Completed
            } else {
                match current {
                    Some(idx) if i < idx => StepState::Completed,
                    Some(idx) if i == idx => StepState::Active,
                    _ => StepState::Pending,
                }
            };
            TimelineStepView {
                id: s.id,
                name: s.name.clone(),
                state,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::FINISHED_STEP;

    fn workflow() -> Vec<WorkflowStep> {
        vec![
            WorkflowStep::new(1, "รับเรื่อง"),
            WorkflowStep::new(2, "ดำเนินการ"),
            WorkflowStep::new(3, "เสร็จสิ้น"),
        ]
    }

    fn states(views: &[TimelineStepView]) -> Vec<StepState> {
        views.iter().map(|v| v.state).collect()
    }

    #[test]
    fn middle_step_active() {
        let views = build_timeline(&workflow(), Some("ดำเนินการ"), JobStatus::Active);
        assert_eq!(
            states(&views),
            vec![StepState::Completed, StepState::Active, StepState::Pending]
        );
        assert_eq!(views[1].id, 2);
        assert_eq!(views[1].name, "ดำเนินการ");
    }

    #[test]
    fn unmatched_step_is_all_pending() {
        let views = build_timeline(&workflow(), Some("ไม่ตรงกับขั้นตอนใด"), JobStatus::Active);
        assert_eq!(states(&views), vec![StepState::Pending; 3]);
    }

    #[test]
    fn completed_job_is_all_completed() {
        let views = build_timeline(&workflow(), Some("เสร็จสิ้น"), JobStatus::Completed);
        assert_eq!(states(&views), vec![StepState::Completed; 3]);
    }

    #[test]
    fn completed_job_ignores_step() {
        let views = build_timeline(&workflow(), None, JobStatus::Completed);
        assert_eq!(states(&views), vec![StepState::Completed; 3]);

        let views = build_timeline(&workflow(), Some("อื่น"), JobStatus::Completed);
        assert_eq!(states(&views), vec![StepState::Completed; 3]);
    }

    #[test]
    fn missing_step_is_all_pending() {
        let views = build_timeline(&workflow(), None, JobStatus::Pending);
        assert_eq!(states(&views), vec![StepState::Pending; 3]);
    }

    #[test]
    fn empty_workflow_yields_empty_timeline() {
        assert!(build_timeline(&[], Some("รับเรื่อง"), JobStatus::Active).is_empty());
        assert!(build_timeline(&[], None, JobStatus::Completed).is_empty());
    }

    #[test]
    fn finished_sentinel_without_completed_status_uses_index_lookup() {
        // The sentinel is not a step of this workflow, so nothing is reached.
        let views = build_timeline(&workflow(), Some(FINISHED_STEP), JobStatus::Active);
        assert_eq!(states(&views), vec![StepState::Pending; 3]);
    }

    #[test]
    fn duplicate_names_match_first_occurrence() {
        let wf = vec![
            WorkflowStep::new(1, "ตรวจ"),
            WorkflowStep::new(2, "ตรวจ"),
            WorkflowStep::new(3, "จบ"),
        ];
        let views = build_timeline(&wf, Some("ตรวจ"), JobStatus::Active);
        assert_eq!(
            states(&views),
            vec![StepState::Active, StepState::Pending, StepState::Pending]
        );
    }

    #[test]
    fn every_position_is_monotonic_with_single_active() {
        let wf: Vec<WorkflowStep> = (1..=6)
            .map(|i| WorkflowStep::new(i, format!("step-{i}")))
            .collect();

        for (pos, step) in wf.iter().enumerate() {
            for status in [JobStatus::Pending, JobStatus::Active] {
                let views = build_timeline(&wf, Some(&step.name), status);
                let active: Vec<usize> = views
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.state == StepState::Active)
                    .map(|(i, _)| i)
                    .collect();
                assert_eq!(active, vec![pos]);

                let rank = |s: StepState| match s {
                    StepState::Completed => 0,
                    StepState::Active => 1,
                    StepState::Pending => 2,
                };
                let ranks: Vec<u8> = views.iter().map(|v| rank(v.state)).collect();
                assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "not monotonic: {ranks:?}");
            }
        }
    }
}
