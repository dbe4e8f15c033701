//! Repository for the `app_settings` table.

use sqlx::PgPool;

use crate::models::app_setting::AppSettingRow;

const COLUMNS: &str = "key, value, updated_at";

/// Reads and upserts settings documents by key.
pub struct AppSettingRepo;

impl AppSettingRepo {
    pub async fn find(pool: &PgPool, key: &str) -> Result<Option<AppSettingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM app_settings WHERE key = $1");
        sqlx::query_as::<_, AppSettingRow>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the document stored under `key`.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<AppSettingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO app_settings (key, value)
             VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppSettingRow>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
