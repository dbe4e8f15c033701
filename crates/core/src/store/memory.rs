//! In-memory store.
//!
//! Backs the API when no database is configured, and the API test suite.
//! Listings come back newest first, matching the PostgreSQL store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};

use super::{
    ChangeAction, ChangeFeed, ChangeSource, Collection, JobStore, SettingsStore, StoreError,
    StoreEvent, StoreResult, UserStore,
};
use crate::job::{Job, JobFilter, NewJob};
use crate::settings::SettingKey;
use crate::types::DbId;
use crate::user::{NewUser, User};

#[derive(Default)]
struct MemoryState {
    jobs: BTreeMap<DbId, Job>,
    users: BTreeMap<DbId, User>,
    settings: HashMap<SettingKey, Value>,
    next_job_id: DbId,
    next_user_id: DbId,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .rev()
            .filter(|j| filter.matches(j))
            .cloned()
            .collect())
    }

    async fn find_job(&self, id: DbId) -> StoreResult<Option<Job>> {
        Ok(self.state.read().await.jobs.get(&id).cloned())
    }

    async fn find_jobs(&self, ids: &[DbId]) -> StoreResult<Vec<Job>> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .filter(|j| ids.contains(&j.id))
            .cloned()
            .collect())
    }

    async fn search_reception_no(&self, term: &str) -> StoreResult<Vec<Job>> {
        let term = term.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .rev()
            .filter(|j| j.reception_no.to_lowercase().contains(&term))
            .cloned()
            .collect())
    }

    async fn reception_numbers(&self, exclude: Option<DbId>) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .values()
            .filter(|j| Some(j.id) != exclude)
            .map(|j| j.reception_no.clone())
            .collect())
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let mut state = self.state.write().await;
        let lower = job.reception_no.to_lowercase();
        if state
            .jobs
            .values()
            .any(|j| j.reception_no.to_lowercase() == lower)
        {
            return Err(StoreError::Conflict(format!(
                "Reception number '{}' already exists",
                job.reception_no
            )));
        }

        state.next_job_id += 1;
        let now = Utc::now();
        let created = Job {
            id: state.next_job_id,
            reception_no: job.reception_no,
            date: job.date,
            department: job.department,
            job_type: job.job_type,
            owner: job.owner,
            status: job.status,
            step: job.step,
            note: job.note,
            assignees: job.assignees,
            completed_at: None,
            printed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.jobs.insert(created.id, created.clone());
        drop(state);

        self.feed.publish(StoreEvent::record(
            Collection::Jobs,
            ChangeAction::Created,
            created.id,
        ));
        Ok(created)
    }

    async fn update_job(&self, job: &Job) -> StoreResult<Job> {
        let mut state = self.state.write().await;
        if !state.jobs.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        let lower = job.reception_no.to_lowercase();
        if state
            .jobs
            .values()
            .any(|j| j.id != job.id && j.reception_no.to_lowercase() == lower)
        {
            return Err(StoreError::Conflict(format!(
                "Reception number '{}' already exists",
                job.reception_no
            )));
        }
        let stored = state.jobs.get_mut(&job.id).ok_or(StoreError::NotFound)?;
        let created_at = stored.created_at;
        *stored = Job {
            created_at,
            updated_at: Utc::now(),
            ..job.clone()
        };
        let updated = stored.clone();
        drop(state);

        self.feed.publish(StoreEvent::record(
            Collection::Jobs,
            ChangeAction::Updated,
            updated.id,
        ));
        Ok(updated)
    }

    async fn delete_jobs(&self, ids: &[DbId]) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let removed: Vec<DbId> = ids
            .iter()
            .filter(|id| state.jobs.remove(*id).is_some())
            .copied()
            .collect();
        drop(state);

        for id in &removed {
            self.feed
                .publish(StoreEvent::record(Collection::Jobs, ChangeAction::Deleted, *id));
        }
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_setting(&self, key: SettingKey) -> StoreResult<Option<Value>> {
        Ok(self.state.read().await.settings.get(&key).cloned())
    }

    async fn put_setting(&self, key: SettingKey, value: Value) -> StoreResult<()> {
        self.state.write().await.settings.insert(key, value);
        self.feed.publish(StoreEvent::setting(key.as_str()));
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn count_users(&self) -> StoreResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: state.next_user_id,
            username: user.username,
            display_name: user.display_name,
            password_hash: user.password_hash,
            role: user.role,
            departments: user.departments,
            is_active: true,
            failed_login_count: 0,
            locked_until: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());
        drop(state);

        self.feed.publish(StoreEvent::record(
            Collection::Users,
            ChangeAction::Created,
            created.id,
        ));
        Ok(created)
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let mut state = self.state.write().await;
        let stored = state.users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        let created_at = stored.created_at;
        *stored = User {
            created_at,
            updated_at: Utc::now(),
            ..user.clone()
        };
        let updated = stored.clone();
        drop(state);

        self.feed.publish(StoreEvent::record(
            Collection::Users,
            ChangeAction::Updated,
            updated.id,
        ));
        Ok(updated)
    }
}

impl ChangeSource for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }
}
