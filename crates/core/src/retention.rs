//! Retention of completed jobs.
//!
//! Completed jobs are kept for [`RETENTION_DAYS`] after completion and then
//! become eligible for an explicit purge.

use chrono::Duration;
use serde::Serialize;

use crate::job::Job;
use crate::types::{DbId, Timestamp};

pub const RETENTION_DAYS: i64 = 30;

/// Jobs with at most this many days left are "expiring soon".
pub const EXPIRING_SOON_DAYS: i64 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionEntry {
    pub job_id: DbId,
    pub reception_no: String,
    pub department: String,
    pub owner: String,
    pub completed_at: Timestamp,
    pub deletion_at: Timestamp,
    /// Whole days left, rounded up and never negative.
    pub days_remaining: i64,
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RetentionStats {
    pub total: usize,
    pub expired: usize,
    pub expiring_soon: usize,
    pub safe: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionOverview {
    pub retention_days: i64,
    pub stats: RetentionStats,
    pub jobs: Vec<RetentionEntry>,
}

fn ceil_days(d: Duration) -> i64 {
    let ms = d.num_milliseconds();
    ms.div_euclid(MILLIS_PER_DAY) + i64::from(ms.rem_euclid(MILLIS_PER_DAY) != 0)
}

/// Retention entry for a completed job, `None` for any other job.
pub fn retention_entry(job: &Job, now: Timestamp) -> Option<RetentionEntry> {
    if !job.status.is_completed() {
        return None;
    }
    let completed_at = job.completed_at?;
    let deletion_at = completed_at + Duration::days(RETENTION_DAYS);
    let remaining = ceil_days(deletion_at - now);
    Some(RetentionEntry {
        job_id: job.id,
        reception_no: job.reception_no.clone(),
        department: job.department.clone(),
        owner: job.owner.clone(),
        completed_at,
        deletion_at,
        days_remaining: remaining.max(0),
        expired: remaining <= 0,
    })
}

/// All retained jobs, soonest deletion first, with summary counts.
pub fn retention_overview<'a>(
    jobs: impl IntoIterator<Item = &'a Job>,
    now: Timestamp,
) -> RetentionOverview {
    let mut entries: Vec<RetentionEntry> = jobs
        .into_iter()
        .filter_map(|j| retention_entry(j, now))
        .collect();
    entries.sort_by_key(|e| e.days_remaining);

    let expired = entries.iter().filter(|e| e.expired).count();
    let expiring_soon = entries
        .iter()
        .filter(|e| e.days_remaining > 0 && e.days_remaining <= EXPIRING_SOON_DAYS)
        .count();
    let stats = RetentionStats {
        total: entries.len(),
        expired,
        expiring_soon,
        safe: entries.len() - expired - expiring_soon,
    };

    RetentionOverview {
        retention_days: RETENTION_DAYS,
        stats,
        jobs: entries,
    }
}

/// Ids of jobs whose retention period has run out.
pub fn expired_job_ids<'a>(jobs: impl IntoIterator<Item = &'a Job>, now: Timestamp) -> Vec<DbId> {
    jobs.into_iter()
        .filter_map(|j| retention_entry(j, now))
        .filter(|e| e.expired)
        .map(|e| e.job_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::department::DEPT_SURVEY;
    use crate::job::tests::sample_job;
    use crate::status::JobStatus;

    fn completed(id: DbId, at: Timestamp) -> Job {
        let mut j = sample_job(id, DEPT_SURVEY);
        j.status = JobStatus::Completed;
        j.completed_at = Some(at);
        j
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_remaining_rounds_up() {
        let job = completed(1, now() - Duration::days(25) - Duration::hours(1));
        let e = retention_entry(&job, now()).unwrap();
        assert_eq!(e.days_remaining, 5);
        assert!(!e.expired);
    }

    #[test]
    fn expired_clamps_to_zero() {
        let job = completed(1, now() - Duration::days(40));
        let e = retention_entry(&job, now()).unwrap();
        assert_eq!(e.days_remaining, 0);
        assert!(e.expired);
    }

    #[test]
    fn exactly_at_deadline_is_expired() {
        let job = completed(1, now() - Duration::days(RETENTION_DAYS));
        assert!(retention_entry(&job, now()).unwrap().expired);
    }

    #[test]
    fn ignores_open_or_unstamped_jobs() {
        let open = sample_job(1, DEPT_SURVEY);
        let mut unstamped = completed(2, now());
        unstamped.completed_at = None;
        assert!(retention_entry(&open, now()).is_none());
        assert!(retention_entry(&unstamped, now()).is_none());
    }

    #[test]
    fn overview_sorts_and_counts() {
        let jobs = vec![
            completed(1, now() - Duration::days(2)),
            completed(2, now() - Duration::days(35)),
            completed(3, now() - Duration::days(27)),
            sample_job(4, DEPT_SURVEY),
        ];
        let overview = retention_overview(&jobs, now());

        let ids: Vec<_> = overview.jobs.iter().map(|e| e.job_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(
            overview.stats,
            RetentionStats {
                total: 3,
                expired: 1,
                expiring_soon: 1,
                safe: 1
            }
        );
        assert_eq!(expired_job_ids(&jobs, now()), vec![2]);
    }
}
