//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Optional `?department=` filter, used by the dashboard and by
/// reception-number suggestions.
#[derive(Debug, Deserialize)]
pub struct DepartmentParams {
    pub department: Option<String>,
}
