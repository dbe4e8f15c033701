//! Well-known role names and department-scoped access checks.
//!
//! These must match the CHECK constraint in `20260301000003_create_users_table.sql`.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STAFF];

pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Admins reach every department; staff only the ones they belong to.
pub fn can_access_department(role: &str, departments: &[String], department: &str) -> bool {
    role == ROLE_ADMIN || departments.iter().any(|d| d == department)
}

pub fn ensure_department_access(
    role: &str,
    departments: &[String],
    department: &str,
) -> Result<(), CoreError> {
    if can_access_department(role, departments, department) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "No access to department '{department}'"
        )))
    }
}
