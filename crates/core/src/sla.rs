//! Elapsed-time classification for open jobs.
//!
//! Pure logic with no store access. The caller looks up the department's
//! thresholds and decides whether the job is exempt (finished jobs are not
//! classified at all).

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Warning threshold used when a department has no settings.
pub const DEFAULT_WARNING_DAYS: i64 = 7;

/// Critical threshold used when a department has no settings.
pub const DEFAULT_CRITICAL_DAYS: i64 = 30;

/// The land office runs on Indochina Time (UTC+7).
const OFFICE_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Per-department day thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaThresholds {
    #[serde(alias = "warning", alias = "warningDays")]
    pub warning_days: i64,
    #[serde(alias = "critical", alias = "criticalDays")]
    pub critical_days: i64,
}

impl Default for SlaThresholds {
    fn default() -> Self {
        Self {
            warning_days: DEFAULT_WARNING_DAYS,
            critical_days: DEFAULT_CRITICAL_DAYS,
        }
    }
}

impl SlaThresholds {
    pub fn new(warning_days: i64, critical_days: i64) -> Self {
        Self {
            warning_days,
            critical_days,
        }
    }

    /// Thresholds must be non-negative. Their relative order is not enforced.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.warning_days < 0 || self.critical_days < 0 {
            return Err(CoreError::Validation(format!(
                "Thresholds must be non-negative, got warning={} critical={}",
                self.warning_days, self.critical_days
            )));
        }
        Ok(())
    }
}

/// Severity bucket for a job's elapsed days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaBucket {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaClassification {
    pub elapsed_days: i64,
    pub bucket: SlaBucket,
}

/// Whole days between two dates, ignoring which one is earlier.
pub fn elapsed_days(start: NaiveDate, now: NaiveDate) -> i64 {
    (now - start).num_days().abs()
}

/// Classify the time elapsed since `start`.
///
/// Strictly greater than a threshold crosses it: exactly `warning_days`
/// is still normal, exactly `critical_days` is still a warning.
pub fn classify(start: NaiveDate, now: NaiveDate, thresholds: &SlaThresholds) -> SlaClassification {
    let elapsed_days = elapsed_days(start, now);
    let bucket = if elapsed_days > thresholds.critical_days {
        SlaBucket::Critical
    } else if elapsed_days > thresholds.warning_days {
        SlaBucket::Warning
    } else {
        SlaBucket::Normal
    };
    SlaClassification {
        elapsed_days,
        bucket,
    }
}

/// The calendar date at the land office for a UTC instant.
pub fn office_today(now: Timestamp) -> NaiveDate {
    let offset = FixedOffset::east_opt(OFFICE_UTC_OFFSET_SECS).expect("valid offset");
    now.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn default_thresholds() -> SlaThresholds {
        SlaThresholds::default()
    }

    #[test]
    fn nine_days_is_warning() {
        let c = classify(date("2024-01-01"), date("2024-01-10"), &default_thresholds());
        assert_eq!(c.elapsed_days, 9);
        assert_eq!(c.bucket, SlaBucket::Warning);
    }

    #[test]
    fn thirty_five_days_is_critical() {
        let c = classify(date("2024-01-01"), date("2024-02-05"), &default_thresholds());
        assert_eq!(c.elapsed_days, 35);
        assert_eq!(c.bucket, SlaBucket::Critical);
    }

    #[test]
    fn boundaries_are_exclusive() {
        let t = SlaThresholds::new(7, 30);
        let start = date("2024-01-01");
        let at = |days: i64| classify(start, start + chrono::Duration::days(days), &t).bucket;

        assert_eq!(at(0), SlaBucket::Normal);
        assert_eq!(at(7), SlaBucket::Normal);
        assert_eq!(at(8), SlaBucket::Warning);
        assert_eq!(at(30), SlaBucket::Warning);
        assert_eq!(at(31), SlaBucket::Critical);
    }

    #[test]
    fn symmetric_under_swap() {
        let t = SlaThresholds::new(3, 7);
        let a = date("2024-03-01");
        let b = date("2024-03-12");
        assert_eq!(classify(a, b, &t), classify(b, a, &t));
    }

    #[test]
    fn future_start_uses_absolute_difference() {
        let c = classify(date("2024-01-10"), date("2024-01-01"), &default_thresholds());
        assert_eq!(c.elapsed_days, 9);
    }

    #[test]
    fn defaults_are_seven_and_thirty() {
        assert_eq!(default_thresholds(), SlaThresholds::new(7, 30));
    }

    #[test]
    fn accepts_legacy_field_names() {
        let t: SlaThresholds = serde_json::from_str(r#"{"warning": 3, "critical": 7}"#).unwrap();
        assert_eq!(t, SlaThresholds::new(3, 7));
    }

    #[test]
    fn negative_thresholds_rejected() {
        assert!(SlaThresholds::new(-1, 5).validate().is_err());
        assert!(SlaThresholds::new(0, 0).validate().is_ok());
    }

    #[test]
    fn office_date_rolls_over_at_utc_17() {
        let before = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 16, 59, 0).unwrap();
        let after = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap();
        assert_eq!(office_today(before), date("2024-01-01"));
        assert_eq!(office_today(after), date("2024-01-02"));
    }
}
