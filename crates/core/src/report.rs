//! Dashboard statistics and per-department workload reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::job::Job;
use crate::settings::AppSettings;
use crate::sla::{classify, SlaBucket};
use crate::status::JobStatus;
use crate::types::CalendarDate;

/// Label for jobs without assignees on the dashboard.
pub const DASHBOARD_UNASSIGNED: &str = "ไม่ระบุ";

/// Label for jobs without assignees in department reports.
pub const REPORT_UNASSIGNED: &str = "(ยังไม่ระบุผู้รับผิดชอบ)";

/// Number of assignees shown on the dashboard.
pub const TOP_ASSIGNEES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentWorkload {
    pub name: String,
    pub completed: u32,
    pub ongoing: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssigneeWorkload {
    pub name: String,
    pub completed: u32,
    pub ongoing: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: u32,
    pub pending: u32,
    pub active: u32,
    pub completed: u32,
    pub departments: Vec<DepartmentWorkload>,
    pub assignees: Vec<AssigneeWorkload>,
}

/// Accumulates rows keyed by name, remembering first-seen order.
struct Tally<T> {
    index: HashMap<String, usize>,
    rows: Vec<T>,
}

impl<T> Tally<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    fn entry(&mut self, name: &str, make: impl FnOnce(String) -> T) -> &mut T {
        let idx = match self.index.get(name) {
            Some(idx) => *idx,
            None => {
                self.rows.push(make(name.to_string()));
                self.index.insert(name.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }
}

/// Dashboard counts over `jobs`, which the caller has already scoped.
pub fn dashboard_stats<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> DashboardStats {
    let mut stats = DashboardStats::default();
    let mut depts = Tally::new();
    let mut people = Tally::new();

    for job in jobs {
        stats.total += 1;
        let done = job.status.is_completed();
        match job.status {
            JobStatus::Pending => stats.pending += 1,
            JobStatus::Active => stats.active += 1,
            JobStatus::Completed => stats.completed += 1,
        }

        let dept = depts.entry(&job.department, |name| DepartmentWorkload {
            name,
            ..Default::default()
        });
        if done {
            dept.completed += 1;
        } else {
            dept.ongoing += 1;
        }

        let unassigned = [DASHBOARD_UNASSIGNED.to_string()];
        let names = if job.assignees.is_empty() {
            &unassigned[..]
        } else {
            &job.assignees[..]
        };
        for name in names {
            let row = people.entry(name, |name| AssigneeWorkload {
                name,
                ..Default::default()
            });
            if done {
                row.completed += 1;
            } else {
                row.ongoing += 1;
            }
            row.total += 1;
        }
    }

    stats.departments = depts.rows;
    let mut assignees = people.rows;
    assignees.sort_by(|a, b| b.total.cmp(&a.total));
    assignees.truncate(TOP_ASSIGNEES);
    stats.assignees = assignees;
    stats
}

/// Optional inclusive range over the reception date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

impl DateRange {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(CoreError::Validation(format!(
                    "Start date {start} is after end date {end}"
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonStats {
    pub name: String,
    pub total: u32,
    pub in_hand: u32,
    pub overdue: u32,
    pub completed: u32,
}

impl PersonStats {
    fn count(&mut self, completed: bool, overdue: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        } else {
            self.in_hand += 1;
            if overdue {
                self.overdue += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentReport {
    pub department: String,
    pub range: DateRange,
    /// Critical threshold in days the overdue count is measured against.
    pub critical_days: i64,
    pub total: u32,
    pub in_hand: u32,
    pub overdue: u32,
    pub completed: u32,
    pub personnel: Vec<PersonStats>,
}

/// Assignee name used for grouping: the part before ` (`, which usually
/// holds a phone number.
pub fn report_name(raw: &str) -> &str {
    raw.split(" (").next().unwrap_or(raw)
}

/// Workload report for one department.
///
/// An in-hand (not completed) job is overdue when its SLA bucket is critical.
pub fn department_report<'a>(
    department: &str,
    jobs: impl IntoIterator<Item = &'a Job>,
    range: DateRange,
    settings: &AppSettings,
    today: CalendarDate,
) -> DepartmentReport {
    let thresholds = settings.thresholds_for(department);
    let mut report = DepartmentReport {
        department: department.to_string(),
        range,
        critical_days: thresholds.critical_days,
        total: 0,
        in_hand: 0,
        overdue: 0,
        completed: 0,
        personnel: Vec::new(),
    };
    let mut people = Tally::new();

    for job in jobs
        .into_iter()
        .filter(|j| j.department == department && range.contains(j.date))
    {
        let completed = job.status.is_completed();
        let overdue =
            !completed && classify(job.date, today, &thresholds).bucket == SlaBucket::Critical;

        report.total += 1;
        if completed {
            report.completed += 1;
        } else {
            report.in_hand += 1;
            if overdue {
                report.overdue += 1;
            }
        }

        let make = |name| PersonStats {
            name,
            ..Default::default()
        };
        // Entries that differ only in their contact suffix are one person.
        let mut names: Vec<&str> = Vec::with_capacity(job.assignees.len());
        for name in job.assignees.iter().map(|raw| report_name(raw)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            names.push(REPORT_UNASSIGNED);
        }
        for name in names {
            people.entry(name, make).count(completed, overdue);
        }
    }

    let mut personnel = people.rows;
    personnel.sort_by(|a, b| b.in_hand.cmp(&a.in_hand));
    report.personnel = personnel;
    report
}
