//! Repository for the `jobs` table.

use landtrack_core::job::{Job, JobFilter, NewJob};
use landtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::job::JobRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reception_no, date, department, job_type, owner, status, step, \
                       note, assignees, completed_at, printed_at, created_at, updated_at";

/// Provides CRUD operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new job, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewJob) -> Result<JobRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (reception_no, date, department, job_type, owner, status, step, note, assignees)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(&input.reception_no)
            .bind(input.date)
            .bind(&input.department)
            .bind(&input.job_type)
            .bind(&input.owner)
            .bind(input.status.as_str())
            .bind(&input.step)
            .bind(&input.note)
            .bind(&input.assignees)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<JobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, JobRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List jobs newest first. Every filter field is optional.
    ///
    /// `search` is matched as a case-insensitive substring of the reception
    /// number or the owner name.
    pub async fn list(pool: &PgPool, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs
             WHERE ($1::TEXT IS NULL OR department = $1)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT[] IS NULL OR department = ANY($3))
               AND ($4::TEXT IS NULL
                    OR STRPOS(LOWER(reception_no), LOWER($4)) > 0
                    OR STRPOS(LOWER(owner), LOWER($4)) > 0)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(&filter.department)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(&filter.scope)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Jobs whose reception number contains `term`, ignoring case, newest first.
    pub async fn search_reception_no(
        pool: &PgPool,
        term: &str,
    ) -> Result<Vec<JobRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs
             WHERE STRPOS(LOWER(reception_no), LOWER($1)) > 0
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(term)
            .fetch_all(pool)
            .await
    }

    /// All reception numbers, optionally leaving out one job.
    pub async fn reception_numbers(
        pool: &PgPool,
        exclude: Option<DbId>,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT reception_no FROM jobs WHERE ($1::BIGINT IS NULL OR id <> $1)",
        )
        .bind(exclude)
        .fetch_all(pool)
        .await
    }

    /// Overwrite every mutable column of a job.
    ///
    /// Returns `None` if no row with the job's id exists.
    pub async fn update(pool: &PgPool, job: &Job) -> Result<Option<JobRow>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                reception_no = $2,
                date = $3,
                job_type = $4,
                owner = $5,
                status = $6,
                step = $7,
                note = $8,
                assignees = $9,
                completed_at = $10,
                printed_at = $11,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&query)
            .bind(job.id)
            .bind(&job.reception_no)
            .bind(job.date)
            .bind(&job.job_type)
            .bind(&job.owner)
            .bind(job.status.as_str())
            .bind(&job.step)
            .bind(&job.note)
            .bind(&job.assignees)
            .bind(job.completed_at)
            .bind(job.printed_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete jobs by id, returning the ids that existed.
    pub async fn delete_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("DELETE FROM jobs WHERE id = ANY($1) RETURNING id")
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
