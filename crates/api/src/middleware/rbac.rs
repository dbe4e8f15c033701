//! Role gates layered on top of [`AuthUser`].
//!
//! Department scoping is checked per handler through
//! [`AuthUser::ensure_access`]. The extractors here only cover endpoints that
//! are closed to staff altogether (user management, retention purge).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use landtrack_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated administrator. Staff get 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            Ok(RequireAdmin(user))
        } else {
            tracing::debug!(user_id = user.user_id, "Admin-only endpoint refused");
            Err(CoreError::Forbidden("Administrator access required".into()).into())
        }
    }
}
