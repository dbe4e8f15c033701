//! Settings document row model.

use landtrack_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `app_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct AppSettingRow {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: Timestamp,
}
