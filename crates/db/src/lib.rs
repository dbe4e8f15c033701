//! PostgreSQL persistence for the land-office tracker.
//!
//! [`PgStore`] implements the storage ports of `landtrack_core::store` on top
//! of the repositories in [`repositories`].

pub mod models;
pub mod repositories;
pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub use store::PgStore;

pub type DbPool = PgPool;

/// Maximum pooled connections. A single land office rarely needs more.
const MAX_CONNECTIONS: u32 = 10;

const ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connect a pool to `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
