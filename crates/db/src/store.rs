//! [`PgStore`]: the storage ports backed by PostgreSQL.

use async_trait::async_trait;
use landtrack_core::job::{Job, JobFilter, NewJob};
use landtrack_core::settings::SettingKey;
use landtrack_core::store::{
    ChangeAction, ChangeFeed, ChangeSource, Collection, JobStore, SettingsStore, StoreError,
    StoreEvent, StoreResult, UserStore,
};
use landtrack_core::types::DbId;
use landtrack_core::user::{NewUser, User};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::repositories::{AppSettingRepo, JobRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(match db_err.constraint() {
                Some("uq_jobs_reception_no_lower") => "Reception number already exists".into(),
                Some("users_username_key") => "Username already exists".into(),
                _ => db_err.message().to_string(),
            })
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Backend(other.to_string())
        }
    }
}

fn to_job(row: crate::models::job::JobRow) -> StoreResult<Job> {
    let id = row.id;
    Job::try_from(row).map_err(|e| {
        tracing::error!(job_id = id, error = %e, "Corrupt job row");
        StoreError::Backend(e.to_string())
    })
}

fn to_jobs(rows: Vec<crate::models::job::JobRow>) -> StoreResult<Vec<Job>> {
    rows.into_iter().map(to_job).collect()
}

/// Store backed by a PostgreSQL pool. Mutations are announced on the feed
/// after the statement succeeds.
pub struct PgStore {
    pool: DbPool,
    feed: ChangeFeed,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::default(),
        }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn list_jobs(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        to_jobs(JobRepo::list(&self.pool, filter).await.map_err(map_sqlx)?)
    }

    async fn find_job(&self, id: DbId) -> StoreResult<Option<Job>> {
        JobRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx)?
            .map(to_job)
            .transpose()
    }

    async fn find_jobs(&self, ids: &[DbId]) -> StoreResult<Vec<Job>> {
        to_jobs(JobRepo::find_by_ids(&self.pool, ids).await.map_err(map_sqlx)?)
    }

    async fn search_reception_no(&self, term: &str) -> StoreResult<Vec<Job>> {
        to_jobs(
            JobRepo::search_reception_no(&self.pool, term)
                .await
                .map_err(map_sqlx)?,
        )
    }

    async fn reception_numbers(&self, exclude: Option<DbId>) -> StoreResult<Vec<String>> {
        JobRepo::reception_numbers(&self.pool, exclude)
            .await
            .map_err(map_sqlx)
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let created = to_job(JobRepo::create(&self.pool, &job).await.map_err(map_sqlx)?)?;
        tracing::info!(job_id = created.id, reception_no = %created.reception_no, "Job created");
        self.feed.publish(StoreEvent::record(
            Collection::Jobs,
            ChangeAction::Created,
            created.id,
        ));
        Ok(created)
    }

    async fn update_job(&self, job: &Job) -> StoreResult<Job> {
        let row = JobRepo::update(&self.pool, job)
            .await
            .map_err(map_sqlx)?
            .ok_or(StoreError::NotFound)?;
        let updated = to_job(row)?;
        self.feed.publish(StoreEvent::record(
            Collection::Jobs,
            ChangeAction::Updated,
            updated.id,
        ));
        Ok(updated)
    }

    async fn delete_jobs(&self, ids: &[DbId]) -> StoreResult<u64> {
        let deleted = JobRepo::delete_many(&self.pool, ids)
            .await
            .map_err(map_sqlx)?;
        for id in &deleted {
            self.feed
                .publish(StoreEvent::record(Collection::Jobs, ChangeAction::Deleted, *id));
        }
        tracing::info!(count = deleted.len(), "Jobs deleted");
        Ok(deleted.len() as u64)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_setting(&self, key: SettingKey) -> StoreResult<Option<Value>> {
        Ok(AppSettingRepo::find(&self.pool, key.as_str())
            .await
            .map_err(map_sqlx)?
            .map(|row| row.value))
    }

    async fn put_setting(&self, key: SettingKey, value: Value) -> StoreResult<()> {
        AppSettingRepo::upsert(&self.pool, key.as_str(), &value)
            .await
            .map_err(map_sqlx)?;
        tracing::info!(key = %key, "Setting saved");
        self.feed.publish(StoreEvent::setting(key.as_str()));
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = UserRepo::list(&self.pool).await.map_err(map_sqlx)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx)?
            .map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(map_sqlx)?
            .map(User::from))
    }

    async fn count_users(&self) -> StoreResult<i64> {
        UserRepo::count(&self.pool).await.map_err(map_sqlx)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created = User::from(UserRepo::create(&self.pool, &user).await.map_err(map_sqlx)?);
        tracing::info!(user_id = created.id, username = %created.username, "User created");
        self.feed.publish(StoreEvent::record(
            Collection::Users,
            ChangeAction::Created,
            created.id,
        ));
        Ok(created)
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let updated = UserRepo::update(&self.pool, user)
            .await
            .map_err(map_sqlx)?
            .map(User::from)
            .ok_or(StoreError::NotFound)?;
        self.feed.publish(StoreEvent::record(
            Collection::Users,
            ChangeAction::Updated,
            updated.id,
        ));
        Ok(updated)
    }
}

impl ChangeSource for PgStore {
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }
}
