//! Key-value preference store backed by Postgres

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::StoreError;
use crate::dashboard::PreferenceStore;

#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn load(&self, user_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let value: Option<Value> = sqlx::query_scalar(
            "SELECT value FROM dashboard_preferences WHERE user_id = $1 AND key = $2",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn save(&self, user_id: &str, key: &str, value: Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO dashboard_preferences (user_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
