//! Storage ports.
//!
//! The HTTP layer talks to storage only through these traits, so the same
//! handlers run against PostgreSQL (`landtrack-db`) or the in-memory store.
//! Every mutation is announced on a [`ChangeFeed`].

mod feed;
pub mod memory;

pub use feed::{ChangeAction, ChangeFeed, Collection, StoreEvent};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::job::{Job, JobFilter, NewJob};
use crate::settings::{AppSettings, SettingKey};
use crate::types::DbId;
use crate::user::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;

    async fn find_job(&self, id: DbId) -> StoreResult<Option<Job>>;

    /// Jobs with the given ids, in id order. Unknown ids are skipped.
    async fn find_jobs(&self, ids: &[DbId]) -> StoreResult<Vec<Job>>;

    /// Jobs whose reception number contains `term`, ignoring case.
    async fn search_reception_no(&self, term: &str) -> StoreResult<Vec<Job>>;

    /// Every reception number except the one of `exclude`.
    async fn reception_numbers(&self, exclude: Option<DbId>) -> StoreResult<Vec<String>>;

    async fn create_job(&self, job: NewJob) -> StoreResult<Job>;

    /// Persist every mutable field of `job` and bump `updated_at`.
    async fn update_job(&self, job: &Job) -> StoreResult<Job>;

    /// Delete jobs by id, returning how many existed.
    async fn delete_jobs(&self, ids: &[DbId]) -> StoreResult<u64>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: SettingKey) -> StoreResult<Option<Value>>;

    async fn put_setting(&self, key: SettingKey, value: Value) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn count_users(&self) -> StoreResult<i64>;

    /// Fails with [`StoreError::Conflict`] when the username is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    async fn update_user(&self, user: &User) -> StoreResult<User>;
}

pub trait ChangeSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Everything the application needs from storage.
pub trait Store: JobStore + SettingsStore + UserStore + ChangeSource {}

impl<T> Store for T where T: JobStore + SettingsStore + UserStore + ChangeSource {}

/// Load all settings documents, defaulting the missing ones.
pub async fn load_settings(store: &(impl SettingsStore + ?Sized)) -> StoreResult<AppSettings> {
    Ok(AppSettings::from_documents(
        store.get_setting(SettingKey::Workflows).await?,
        store.get_setting(SettingKey::DeptSettings).await?,
        store.get_setting(SettingKey::JobTypes).await?,
    ))
}

/// Serialize and store one settings document.
pub async fn save_setting<T: serde::Serialize + Sync>(
    store: &(impl SettingsStore + ?Sized),
    key: SettingKey,
    value: &T,
) -> StoreResult<()> {
    let json = serde_json::to_value(value)
        .map_err(|e| StoreError::Backend(format!("Failed to encode {key}: {e}")))?;
    store.put_setting(key, json).await
}
