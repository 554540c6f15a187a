//! SQLite-backed settings store.

use async_trait::async_trait;
use sqlx::SqliteConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use super::SettingsStore;
use crate::error::StoreError;
use crate::{Error, Result};

/// Settings persisted in a SQLite database
///
/// Several processes may open the same file; `put_if_absent` relies on the
/// primary key so concurrent first writers converge on one row.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn query_failed(context: &str, e: sqlx::Error) -> Error {
    Error::Store(StoreError::QueryFailed(format!("{context}: {e}")))
}

impl SqliteStore {
    /// Open (or create) the settings database and run migrations
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Store(StoreError::ConnectionFailed(format!(
                    "Failed to create database directory: {e}"
                )))
            })?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| {
                Error::Store(StoreError::ConnectionFailed(format!(
                    "Failed to parse database path: {e}"
                )))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            Error::Store(StoreError::ConnectionFailed(format!(
                "Failed to connect to database: {e}"
            )))
        })?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Close the connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn run_migrations(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            Error::Store(StoreError::ConnectionFailed(format!(
                "Failed to acquire connection: {e}"
            )))
        })?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            Error::Store(StoreError::MigrationFailed(format!(
                "Failed to create schema_version table: {e}"
            )))
        })?;

        let migration_failed =
            |e: sqlx::Error| Error::Store(StoreError::MigrationFailed(e.to_string()));

        // IMMEDIATE takes the write lock up front, so a second opener waits
        // here and then sees the version the first one committed
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(migration_failed)?;

        let result = async {
            let current_version: Option<i64> =
                sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
                    .fetch_one(&mut *conn)
                    .await?;

            if current_version.unwrap_or(0) < 1 {
                Self::migrate_v1(&mut conn).await?;
            }

            Ok::<(), sqlx::Error>(())
        }
        .await;

        match result {
            Ok(()) => {
                sqlx::query("COMMIT")
                    .execute(&mut *conn)
                    .await
                    .map_err(migration_failed)?;
                Ok(())
            }
            Err(e) => {
                sqlx::query("ROLLBACK").execute(&mut *conn).await.ok();
                Err(migration_failed(e))
            }
        }
    }

    /// Migration v1: key-value settings table
    ///
    /// Runs inside the transaction opened by `run_migrations`.
    async fn migrate_v1(conn: &mut SqliteConnection) -> std::result::Result<(), sqlx::Error> {
        tracing::info!("Applying settings migration v1");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (1, ?)")
            .bind(chrono::Utc::now().timestamp())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, String>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        // One statement, so the read is a single snapshot
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!("SELECT key, value FROM settings WHERE key IN ({placeholders})");

        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        for key in keys {
            query = query.bind(*key);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("Failed to read settings", e))?;

        Ok(rows.into_iter().collect())
    }

    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| query_failed("Failed to begin settings transaction", e))?;

        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO settings (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
            )
            .bind(*key)
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| query_failed("Failed to write setting", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| query_failed("Failed to commit settings", e))
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> Result<String> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("Failed to insert setting", e))?;

        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_failed("Failed to read back setting", e))
    }
}
