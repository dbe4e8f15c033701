//! First admin account.
//!
//! A fresh deployment has no users and therefore nobody who can create one.
//! When the user store is empty and a bootstrap password is configured, an
//! admin covering every department is created at startup.

use landtrack_core::department::DEPARTMENTS;
use landtrack_core::error::CoreError;
use landtrack_core::roles::ROLE_ADMIN;
use landtrack_core::sanitize::validate_password;
use landtrack_core::store::UserStore;
use landtrack_core::user::{NewUser, User};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

pub const BOOTSTRAP_DISPLAY_NAME: &str = "ผู้ดูแลระบบ";

/// Create the bootstrap admin if no user exists yet.
///
/// Returns the created account, or `None` when users already exist.
pub async fn ensure_admin(
    store: &(impl UserStore + ?Sized),
    username: &str,
    password: &str,
) -> AppResult<Option<User>> {
    if store.count_users().await? > 0 {
        return Ok(None);
    }
    if username.trim().is_empty() {
        return Err(CoreError::Validation(
            "Bootstrap admin username must not be empty".into(),
        )
        .into());
    }
    validate_password(password)?;

    let password_hash =
        hash_password(password).map_err(|e| AppError::InternalError(e.to_string()))?;
    let user = store
        .create_user(NewUser {
            username: username.trim().to_string(),
            display_name: BOOTSTRAP_DISPLAY_NAME.to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
            departments: DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use landtrack_core::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn creates_admin_on_empty_store_only() {
        let store = MemoryStore::new();

        let created = ensure_admin(&store, "admin", "changeme123")
            .await
            .unwrap()
            .expect("admin should be created");
        assert_eq!(created.role, ROLE_ADMIN);
        assert_eq!(created.departments.len(), DEPARTMENTS.len());

        let again = ensure_admin(&store, "admin2", "changeme123").await.unwrap();
        assert!(again.is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = MemoryStore::new();
        let result = ensure_admin(&store, "admin", "short").await;
        assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
    }
}
