//! SQLite key-value backend.
//!
//! One table per logical store (threads, jobs), sharing a pool:
//!
//! ```text
//! key TEXT PRIMARY KEY | value TEXT | updated_at TEXT | expires_at INTEGER
//! ```
//!
//! Expired rows are invisible to `get` and swept by `purge_expired`.

use async_trait::async_trait;
use chrono::Utc;
use fobench_core::KvBackend;
use fobench_core::error::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// A durable key-value backend over one SQLite table.
pub struct SqliteKv {
    pool: SqlitePool,
    table: String,
}

impl SqliteKv {
    /// Open (or create) a database and return a pool that several tables can share.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn open_pool(path: &str) -> Result<SqlitePool, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Unavailable(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // every connection to :memory: is its own database
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to open SQLite: {e}")))?;

        info!("SQLite store opened at {path}");
        Ok(pool)
    }

    /// Open a database and bind this backend to `table`.
    pub async fn new(path: &str, table: &str) -> Result<Self, StoreError> {
        let pool = Self::open_pool(path).await?;
        Self::from_pool(pool, table).await
    }

    /// Bind to `table` in an existing pool, creating the table if needed.
    pub async fn from_pool(pool: SqlitePool, table: &str) -> Result<Self, StoreError> {
        if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StoreError::MigrationFailed(format!(
                "invalid table name '{table}'"
            )));
        }
        let backend = Self {
            pool,
            table: table.to_string(),
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key         TEXT PRIMARY KEY NOT NULL,
                value       TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                expires_at  INTEGER NOT NULL
            )
            "#,
            self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("{} table: {e}", self.table)))?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_expires_at ON {0}(expires_at)",
            self.table
        ))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("expires_at index: {e}")))?;

        debug!(table = %self.table, "SQLite migrations complete");
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl KvBackend for SqliteKv {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let now = Utc::now();
        let expires_at = crate::expiry_timestamp(ttl);

        sqlx::query(&format!(
            r#"
            INSERT INTO {} (key, value, updated_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at,
                expires_at = excluded.expires_at
            "#,
            self.table
        ))
        .bind(key)
        .bind(value)
        .bind(now.to_rfc3339())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("put {key}: {e}")))?;

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE expires_at <= ?", self.table))
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT value FROM {} WHERE key = ? AND expires_at > ?",
            self.table
        ))
        .bind(key)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("get {key}: {e}")))?;

        row.map(|r| {
            r.try_get::<String, _>("value")
                .map_err(|e| StoreError::QueryFailed(format!("value column: {e}")))
        })
        .transpose()
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query(&format!("DELETE FROM {} WHERE key = ?", self.table))
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("delete {key}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_backend(table: &str) -> SqliteKv {
        SqliteKv::new("sqlite::memory:", table).await.unwrap()
    }

    #[tokio::test]
    async fn put_get_delete() {
        let kv = test_backend("agent_threads").await;
        kv.put("t1", "[]".into(), Duration::from_secs(3600)).await.unwrap();
        assert_eq!(kv.get("t1").await.unwrap().as_deref(), Some("[]"));

        kv.delete("t1").await.unwrap();
        assert!(kv.get("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_is_full_replacement() {
        let kv = test_backend("agent_threads").await;
        kv.put("t1", "first".into(), Duration::from_secs(3600)).await.unwrap();
        kv.put("t1", "second".into(), Duration::from_secs(3600)).await.unwrap();
        assert_eq!(kv.get("t1").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn expired_rows_hidden_and_purged() {
        let kv = test_backend("agent_jobs").await;
        kv.put("old", "x".into(), Duration::ZERO).await.unwrap();
        kv.put("new", "y".into(), Duration::from_secs(3600)).await.unwrap();

        assert!(kv.get("old").await.unwrap().is_none());
        assert_eq!(kv.purge_expired().await.unwrap(), 1);
        assert_eq!(kv.get("new").await.unwrap().as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn tables_share_a_pool_without_colliding() {
        let pool = SqliteKv::open_pool("sqlite::memory:").await.unwrap();
        let threads = SqliteKv::from_pool(pool.clone(), "agent_threads").await.unwrap();
        let jobs = SqliteKv::from_pool(pool, "agent_jobs").await.unwrap();

        threads.put("id-1", "thread".into(), Duration::from_secs(60)).await.unwrap();
        jobs.put("id-1", "job".into(), Duration::from_secs(60)).await.unwrap();

        assert_eq!(threads.get("id-1").await.unwrap().as_deref(), Some("thread"));
        assert_eq!(jobs.get("id-1").await.unwrap().as_deref(), Some("job"));
    }

    #[tokio::test]
    async fn rejects_unsafe_table_names() {
        let pool = SqliteKv::open_pool("sqlite::memory:").await.unwrap();
        assert!(SqliteKv::from_pool(pool, "threads; DROP TABLE x").await.is_err());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = format!("sqlite://{}", dir.path().join("fobench.db").display());

        {
            let kv = SqliteKv::new(&path, "agent_threads").await.unwrap();
            kv.put("t1", "kept".into(), Duration::from_secs(60)).await.unwrap();
        }

        let kv = SqliteKv::new(&path, "agent_threads").await.unwrap();
        assert_eq!(kv.get("t1").await.unwrap().as_deref(), Some("kept"));
    }
}
