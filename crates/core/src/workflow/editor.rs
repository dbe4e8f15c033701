//! Editing operations for a single department workflow.
//!
//! Each function takes the current step list and returns the edited list,
//! leaving persistence to the caller.

use std::collections::HashSet;

use serde::Deserialize;

use super::WorkflowStep;
use crate::error::CoreError;

/// Direction for [`move_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

fn clean_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Step name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

fn find_position(steps: &[WorkflowStep], step_id: i64) -> Result<usize, CoreError> {
    steps
        .iter()
        .position(|s| s.id == step_id)
        .ok_or(CoreError::NotFound {
            entity: "WorkflowStep",
            id: step_id,
        })
}

/// Validate a full replacement workflow: names non-empty, ids unique.
pub fn validate_workflow(steps: &[WorkflowStep]) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for step in steps {
        if step.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Step {} has an empty name",
                step.id
            )));
        }
        if !seen.insert(step.id) {
            return Err(CoreError::Validation(format!(
                "Duplicate step id {}",
                step.id
            )));
        }
    }
    Ok(())
}

/// Append a step. Its id is one more than the largest existing id.
pub fn add_step(steps: &[WorkflowStep], name: &str) -> Result<Vec<WorkflowStep>, CoreError> {
    let name = clean_name(name)?;
    let next_id = steps
        .iter()
        .map(|s| s.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| CoreError::Validation("No step id left after the largest one".into()))?;
    let mut out = steps.to_vec();
    out.push(WorkflowStep::new(next_id, name));
    Ok(out)
}

pub fn rename_step(
    steps: &[WorkflowStep],
    step_id: i64,
    name: &str,
) -> Result<Vec<WorkflowStep>, CoreError> {
    let name = clean_name(name)?;
    let pos = find_position(steps, step_id)?;
    let mut out = steps.to_vec();
    out[pos].name = name;
    Ok(out)
}

pub fn remove_step(steps: &[WorkflowStep], step_id: i64) -> Result<Vec<WorkflowStep>, CoreError> {
    let pos = find_position(steps, step_id)?;
    let mut out = steps.to_vec();
    out.remove(pos);
    Ok(out)
}

/// Swap a step with its neighbour. Moving past either end is a no-op.
pub fn move_step(
    steps: &[WorkflowStep],
    step_id: i64,
    direction: MoveDirection,
) -> Result<Vec<WorkflowStep>, CoreError> {
    let pos = find_position(steps, step_id)?;
    let mut out = steps.to_vec();
    let target = match direction {
        MoveDirection::Up => pos.checked_sub(1),
        MoveDirection::Down => Some(pos + 1).filter(|t| *t < out.len()),
    };
    if let Some(target) = target {
        out.swap(pos, target);
    }
    Ok(out)
}

/// Trim, drop empties and de-duplicate a job-type list, keeping first order.
pub fn normalize_job_types(types: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_string()))
        .map(str::to_string)
        .collect()
}
