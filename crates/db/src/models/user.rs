//! User row model.

use landtrack_core::types::{DbId, Timestamp};
use landtrack_core::user::User;
use sqlx::FromRow;

/// Full user row from the `users` table, password hash included.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub departments: Vec<String>,
    pub is_active: bool,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
            password_hash: row.password_hash,
            role: row.role,
            departments: row.departments,
            is_active: row.is_active,
            failed_login_count: row.failed_login_count,
            locked_until: row.locked_until,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
