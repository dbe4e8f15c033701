//! Job lifecycle status.
//!
//! Staff move a job `pending -> active -> completed` by hand. No transition
//! is validated here: any status may follow any other, and `completed` is
//! only terminal by convention.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

/// All valid status values, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ACTIVE, STATUS_COMPLETED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => STATUS_PENDING,
            JobStatus::Active => STATUS_ACTIVE,
            JobStatus::Completed => STATUS_COMPLETED,
        }
    }

    /// Thai label shown on badges and the public tracking page.
    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "รอดำเนินการ",
            JobStatus::Active => "กำลังดำเนินการ",
            JobStatus::Completed => "เสร็จสิ้น",
        }
    }

    pub fn is_completed(self) -> bool {
        self == JobStatus::Completed
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(JobStatus::Pending),
            STATUS_ACTIVE => Ok(JobStatus::Active),
            STATUS_COMPLETED => Ok(JobStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_valid_status() {
        for s in VALID_STATUSES {
            let parsed: JobStatus = s.parse().expect("valid status");
            assert_eq!(parsed.as_str(), *s);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "cancelled".parse::<JobStatus>().unwrap_err();
        assert!(err.to_string().contains("Invalid status 'cancelled'"));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&JobStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(JobStatus::default(), JobStatus::Pending);
    }

    #[test]
    fn thai_labels() {
        assert_eq!(JobStatus::Pending.label(), "รอดำเนินการ");
        assert_eq!(JobStatus::Completed.label(), "เสร็จสิ้น");
    }
}
