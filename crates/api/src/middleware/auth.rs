//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use landtrack_core::error::CoreError;
use landtrack_core::job::JobFilter;
use landtrack_core::roles::{ensure_department_access, ROLE_ADMIN};
use landtrack_core::store::UserStore;
use landtrack_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token names the account; role and departments are read from the
/// stored user on every request.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    /// `"admin"` or `"staff"`.
    pub role: String,
    /// Departments the user works in.
    pub departments: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn ensure_access(&self, department: &str) -> Result<(), CoreError> {
        ensure_department_access(&self.role, &self.departments, department)
    }

    /// Departments this user may see in listings; `None` for admins.
    pub fn scope(&self) -> Option<Vec<String>> {
        (!self.is_admin()).then(|| self.departments.clone())
    }

    /// A job filter restricted to this user's departments.
    pub fn job_filter(&self) -> JobFilter {
        JobFilter {
            scope: self.scope(),
            ..JobFilter::default()
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Deactivation and role or department edits apply to tokens already
        // issued, so the stored account wins over the claims.
        let user = state
            .store
            .find_user(claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Account not found or deactivated".into(),
                ))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
            departments: user.departments,
        })
    }
}

#[cfg(test)]
mod tests {
    use landtrack_core::department::{DEPT_REGISTRATION, DEPT_SURVEY};
    use landtrack_core::roles::ROLE_STAFF;

    use super::*;

    fn user(role: &str, departments: &[&str]) -> AuthUser {
        AuthUser {
            user_id: 1,
            role: role.to_string(),
            departments: departments.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn staff_scope_is_their_departments() {
        let staff = user(ROLE_STAFF, &[DEPT_SURVEY]);
        assert_eq!(staff.scope(), Some(vec![DEPT_SURVEY.to_string()]));
        assert!(staff.ensure_access(DEPT_SURVEY).is_ok());
        assert!(staff.ensure_access(DEPT_REGISTRATION).is_err());
    }

    #[test]
    fn admin_is_unscoped() {
        let admin = user(ROLE_ADMIN, &[]);
        assert_eq!(admin.scope(), None);
        assert!(admin.ensure_access(DEPT_REGISTRATION).is_ok());
        assert_eq!(admin.job_filter().scope, None);
    }
}
