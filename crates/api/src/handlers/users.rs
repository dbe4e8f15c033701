//! Admin-only user management under `/admin/users`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use landtrack_core::error::CoreError;
use landtrack_core::sanitize::validate_password;
use landtrack_core::store::UserStore;
use landtrack_core::types::DbId;
use landtrack_core::user::{CreateUser, UpdateUser, User};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn hash(password: &str) -> AppResult<String> {
    validate_password(password)?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

async fn find_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = state.store.list_users().await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Returns 201 with the created user. Duplicate usernames give 409.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let password_hash = hash(&input.password)?;

    let user = state
        .store
        .create_user(input.into_new_user(password_hash))
        .await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        created_by = admin.user_id,
        "User created by admin",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /api/v1/admin/users/{id}
///
/// Partial update. A `password` field resets the password and clears any
/// login lock.
pub async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let mut user = find_user(&state, user_id).await?;
    input.apply(&mut user)?;

    if let Some(password) = &input.password {
        user.password_hash = hash(password)?;
        user.failed_login_count = 0;
        user.locked_until = None;
    }

    let user = state.store.update_user(&user).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivate the account. Returns 204. Admins cannot deactivate themselves.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot deactivate your own account".into(),
        )));
    }

    let mut user = find_user(&state, user_id).await?;
    user.is_active = false;
    state.store.update_user(&user).await?;

    tracing::info!(user_id, deactivated_by = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}
