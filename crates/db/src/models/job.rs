//! Job row model.

use landtrack_core::error::CoreError;
use landtrack_core::job::Job;
use landtrack_core::types::{CalendarDate, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `jobs` table. `status` is stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: DbId,
    pub reception_no: String,
    pub date: CalendarDate,
    pub department: String,
    pub job_type: String,
    pub owner: String,
    pub status: String,
    pub step: Option<String>,
    pub note: String,
    pub assignees: Vec<String>,
    pub completed_at: Option<Timestamp>,
    pub printed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<JobRow> for Job {
    type Error = CoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            reception_no: row.reception_no,
            date: row.date,
            department: row.department,
            job_type: row.job_type,
            owner: row.owner,
            status: row.status.parse()?,
            step: row.step,
            note: row.note,
            assignees: row.assignees,
            completed_at: row.completed_at,
            printed_at: row.printed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
