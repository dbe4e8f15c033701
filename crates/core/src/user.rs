//! Staff accounts and login lockout bookkeeping.

use serde::{Deserialize, Serialize};

use crate::department::validate_department;
use crate::error::CoreError;
use crate::roles::validate_role;
use crate::sanitize::{require_text, sanitize_text, MAX_NAME_LEN, MAX_USERNAME_LEN};
use crate::types::{DbId, Timestamp};

/// Maximum consecutive failed login attempts before locking the account.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
pub const LOCK_DURATION_MINS: i64 = 15;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
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

/// A validated account ready to insert. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub departments: Vec<String>,
}

/// Request body for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
    #[serde(default)]
    pub departments: Vec<String>,
}

/// Request body for updating a user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub departments: Option<Vec<String>>,
    pub is_active: Option<bool>,
    /// New password; hashed by the caller before it is stored.
    pub password: Option<String>,
}

impl CreateUser {
    /// Check everything except the password, which the caller validates and
    /// hashes before building a [`NewUser`].
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("username", &self.username, MAX_USERNAME_LEN)?;
        require_text("display_name", &self.display_name, MAX_NAME_LEN)?;
        validate_role(&self.role)?;
        validate_departments(&self.departments)
    }

    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            display_name: sanitize_text(&self.display_name, MAX_NAME_LEN),
            password_hash,
            role: self.role,
            departments: self.departments,
        }
    }
}

impl UpdateUser {
    /// Apply everything except the password to `user`.
    pub fn apply(&self, user: &mut User) -> Result<(), CoreError> {
        if let Some(name) = &self.display_name {
            user.display_name =
                require_text("display_name", &sanitize_text(name, MAX_NAME_LEN), MAX_NAME_LEN)?;
        }
        if let Some(role) = &self.role {
            validate_role(role)?;
            user.role = role.clone();
        }
        if let Some(departments) = &self.departments {
            validate_departments(departments)?;
            user.departments = departments.clone();
        }
        if let Some(active) = self.is_active {
            user.is_active = active;
        }
        Ok(())
    }
}

pub fn validate_departments(departments: &[String]) -> Result<(), CoreError> {
    departments.iter().try_for_each(|d| validate_department(d))
}

impl User {
    pub fn is_locked(&self, now: Timestamp) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Count a failed login, locking the account once the limit is reached.
    ///
    /// An expired lock starts a fresh count.
    pub fn register_failed_login(&mut self, now: Timestamp) {
        if self.locked_until.is_some_and(|until| until <= now) {
            self.failed_login_count = 0;
            self.locked_until = None;
        }
        self.failed_login_count += 1;
        if self.failed_login_count >= MAX_FAILED_ATTEMPTS {
            self.locked_until = Some(now + chrono::Duration::minutes(LOCK_DURATION_MINS));
        }
    }

    pub fn register_successful_login(&mut self, now: Timestamp) {
        self.failed_login_count = 0;
        self.locked_until = None;
        self.last_login_at = Some(now);
    }
}
