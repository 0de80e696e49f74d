// SQLite-backed access store.
//
// Tables:
// - access_levels: one row per (user, level) grant

use crate::core::access::{AccessError, AccessLevel, AccessStore};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashSet;

pub struct SqliteAccessStore {
    pool: Pool<Sqlite>,
}

impl SqliteAccessStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> Result<(), AccessError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS access_levels (
                user_id INTEGER NOT NULL,
                access_level TEXT NOT NULL,
                granted_at TEXT NOT NULL,
                PRIMARY KEY (user_id, access_level)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AccessError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AccessStore for SqliteAccessStore {
    async fn grant(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError> {
        // Re-granting keeps the original timestamp
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO access_levels (user_id, access_level, granted_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id as i64)
        .bind(level.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AccessError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn revoke(&self, user_id: u64, level: AccessLevel) -> Result<(), AccessError> {
        sqlx::query("DELETE FROM access_levels WHERE user_id = ? AND access_level = ?")
            .bind(user_id as i64)
            .bind(level.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| AccessError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn list_user_ids(&self, level: AccessLevel) -> Result<HashSet<u64>, AccessError> {
        let rows = sqlx::query("SELECT user_id FROM access_levels WHERE access_level = ?")
            .bind(level.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AccessError::StorageError(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| row.get::<i64, _>("user_id") as u64)
            .collect())
    }
}
