use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

#[cfg(test)]
pub mod memory;

/// Failure of the persistence layer to read or write a key
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Durable string-to-string storage, the on-device equivalent of a
/// browser's local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if the key was never set.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    async fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed key-value storage
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url` and make sure the
    /// key-value table exists
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // A single long-lived connection keeps `sqlite::memory:` databases alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        info!(url, "key-value storage ready");
        Ok(Self { pool })
    }

    /// Create a new Database instance from the application configuration
    pub async fn new(config: &Config) -> Result<Self> {
        Self::connect(config.database_url()).await
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(self.get_pool())
            .await?;

        debug!(key, found = value.is_some(), "read key");
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.get_pool())
        .await?;

        debug!(key, bytes = value.len(), "wrote key");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.get_pool())
            .await?;

        debug!(key, "removed key");
        Ok(())
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    Database::new(config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        assert_eq!(db.get_item("clients").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_item_overwrites_previous_value() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        db.set_item("clients", "[]").await.unwrap();
        db.set_item("clients", "[{}]").await.unwrap();

        assert_eq!(db.get_item("clients").await.unwrap().as_deref(), Some("[{}]"));
    }

    #[tokio::test]
    async fn remove_item_deletes_only_that_key() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.set_item("clients", "[]").await.unwrap();
        db.set_item("selectedClient", "{}").await.unwrap();

        db.remove_item("selectedClient").await.unwrap();
        db.remove_item("selectedClient").await.unwrap();

        assert_eq!(db.get_item("selectedClient").await.unwrap(), None);
        assert_eq!(db.get_item("clients").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn values_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("kv.db").display());

        let db = Database::connect(&url).await.unwrap();
        db.set_item("clients", r#"[{"id":"1"}]"#).await.unwrap();
        db.close().await;

        let reopened = Database::connect(&url).await.unwrap();
        assert_eq!(
            reopened.get_item("clients").await.unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[tokio::test]
    async fn init_uses_configured_url() {
        let config = Config::from_vars(vec![(
            "DATABASE_URL".to_string(),
            "sqlite::memory:".to_string(),
        )])
        .unwrap();

        let db = init(&config).await.unwrap();
        db.set_item("k", "v").await.unwrap();
        assert_eq!(db.get_item("k").await.unwrap().as_deref(), Some("v"));
    }
}
