//! Reception numbers: `[prefix]<number>/<Thai year>`, e.g. `R123/2568`.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::department::reception_prefix;
use crate::error::CoreError;
use crate::sanitize::{sanitize_search_input, MAX_RECEPTION_NO_LEN};

/// Offset between the Gregorian and Thai Buddhist calendars.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

static RECEPTION_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]?\d+/\d{4}$").expect("valid regex"));

pub fn thai_year(date: NaiveDate) -> i32 {
    date.year() + BUDDHIST_ERA_OFFSET
}

/// Strip unsafe characters and cap the length.
pub fn sanitize(reception_no: &str) -> String {
    sanitize_search_input(reception_no, MAX_RECEPTION_NO_LEN)
}

pub fn validate(reception_no: &str) -> Result<(), CoreError> {
    if reception_no.is_empty() {
        return Err(CoreError::Validation("Reception number is required".into()));
    }
    if !RECEPTION_NO_RE.is_match(reception_no) {
        return Err(CoreError::Validation(format!(
            "Invalid reception number '{reception_no}' (expected e.g. R123/2568)"
        )));
    }
    Ok(())
}

/// The running number of `reception_no` if it carries exactly `prefix` and `year`.
fn running_number(reception_no: &str, prefix: &str, year: i32) -> Option<u64> {
    let rest = reception_no.strip_prefix(prefix)?;
    let (number, y) = rest.split_once('/')?;
    if y != year.to_string() || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Suggest the next reception number for `department` in the year of `today`.
///
/// One past the highest number already issued with the department prefix
/// in that Thai year, starting at 1. Fails when the highest number has no
/// successor.
pub fn next_reception_no<'a>(
    department: &str,
    today: NaiveDate,
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<String, CoreError> {
    let prefix = reception_prefix(department);
    let year = thai_year(today);
    let max = existing
        .into_iter()
        .filter_map(|no| running_number(no, prefix, year))
        .max()
        .unwrap_or(0);
    let next = max.checked_add(1).ok_or_else(|| {
        CoreError::Validation(format!(
            "Reception numbers for {prefix}/{year} are exhausted; enter one manually"
        ))
    })?;
    Ok(format!("{prefix}{next}/{year}"))
}

/// Case-insensitive equality used for duplicate detection and lookup.
pub fn same_reception_no(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
