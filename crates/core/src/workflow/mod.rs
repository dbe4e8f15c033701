//! Per-department workflows.
//!
//! A workflow is an ordered list of named steps. A job records the *name* of
//! the step it has reached, and [`timeline::build_timeline`] turns that name
//! back into a per-step progress view.

pub mod editor;
pub mod timeline;

use serde::{Deserialize, Serialize};

pub use timeline::{build_timeline, StepState, TimelineStepView};

/// Step name given to new jobs when their department has no workflow.
pub const DEFAULT_INITIAL_STEP: &str = "รับเรื่อง";

/// Step text meaning "fully done". Stored by some clients in `job.step`.
pub const FINISHED_STEP: &str = "ดำเนินการเสร็จสิ้น";

/// Marker a client may send as the step to close a job.
pub const COMPLETED_MARKER: &str = "COMPLETED";

/// One named step of a department workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: i64,
    pub name: String,
}

impl WorkflowStep {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Position of the first step whose name equals `name` exactly.
pub fn step_index(workflow: &[WorkflowStep], name: &str) -> Option<usize> {
    workflow.iter().position(|s| s.name == name)
}

/// The final step of a workflow, if it has any.
pub fn last_step(workflow: &[WorkflowStep]) -> Option<&WorkflowStep> {
    workflow.last()
}

/// Step name a freshly created job starts at.
pub fn initial_step_name(workflow: &[WorkflowStep]) -> &str {
    workflow
        .first()
        .map(|s| s.name.as_str())
        .unwrap_or(DEFAULT_INITIAL_STEP)
}

/// Whether `step` asks for the job to be closed (sentinel text or marker).
pub fn is_finish_request(step: &str) -> bool {
    step == FINISHED_STEP || step == COMPLETED_MARKER
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<WorkflowStep> {
        vec![
            WorkflowStep::new(1, "รับเรื่อง"),
            WorkflowStep::new(2, "ดำเนินการ"),
            WorkflowStep::new(3, "เสร็จสิ้น"),
        ]
    }

    #[test]
    fn step_index_matches_exact_name_only() {
        let wf = sample();
        assert_eq!(step_index(&wf, "ดำเนินการ"), Some(1));
        assert_eq!(step_index(&wf, "ดำเนินการ "), None);
    }

    #[test]
    fn initial_step_falls_back_when_workflow_empty() {
        assert_eq!(initial_step_name(&[]), DEFAULT_INITIAL_STEP);
        assert_eq!(initial_step_name(&sample()), "รับเรื่อง");
    }

    #[test]
    fn last_step_of_empty_workflow_is_none() {
        assert!(last_step(&[]).is_none());
        assert_eq!(last_step(&sample()).map(|s| s.id), Some(3));
    }

    #[test]
    fn finish_requests() {
        assert!(is_finish_request(FINISHED_STEP));
        assert!(is_finish_request(COMPLETED_MARKER));
        assert!(!is_finish_request("เสร็จสิ้น"));
    }
}
