//! Persistent key/value store.
//!
//! The store is the sole owner of durable state: a flat mapping from the
//! fixed key set in [`keys`] to JSON text. SQLite backs the real thing;
//! an in-memory map stands in wherever a test or embedder injects one.

mod accessor;
mod notify;

pub use accessor::*;
pub use notify::*;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::errors::AppError;

/// The fixed set of persisted keys.
pub mod keys {
    /// Current week number (integer >= 1).
    pub const WEEK: &str = "rcl_week";
    /// Ordered game list for the current week.
    pub const SCHEDULE: &str = "rcl_schedule";
    /// Mapping team id -> record string, all 32 teams.
    pub const TEAM_RECORDS: &str = "rcl_team_records";
    /// The four link categories.
    pub const LINKS: &str = "rcl_all_links";
    /// Ordered rule sections.
    pub const RULES: &str = "rcl_rules";
    /// Session token while a panel user is logged in.
    pub const SESSION: &str = "rcl_dev_session";
    /// Site-wide like counter.
    pub const LIKES: &str = "rcl_likes";
    /// Whether this store has already registered a like.
    pub const USER_LIKED: &str = "rcl_user_liked";

    /// The content keys cleared by the panel's danger zone, in save order.
    pub const CONTENT: [&str; 5] = [WEEK, SCHEDULE, TEAM_RECORDS, LINKS, RULES];
}

/// Storage backend behind a [`StoreAccessor`].
#[derive(Clone)]
pub enum StoreBackend {
    /// Durable SQLite-backed store (the production path).
    Sqlite(SqlitePool),
    /// In-memory store for tests and embedders.
    Memory(Arc<RwLock<HashMap<String, String>>>),
}

impl StoreBackend {
    /// An empty in-memory backend.
    pub fn memory() -> Self {
        StoreBackend::Memory(Arc::new(RwLock::new(HashMap::new())))
    }

    /// Read the raw JSON text stored under `key`.
    pub async fn read_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        match self {
            StoreBackend::Sqlite(pool) => {
                let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;
                Ok(row.map(|r| r.get("value")))
            }
            StoreBackend::Memory(map) => {
                let map = map.read().map_err(|_| poisoned())?;
                Ok(map.get(key).cloned())
            }
        }
    }

    /// Write raw JSON text under `key`, replacing any previous value.
    pub async fn write_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        match self {
            StoreBackend::Sqlite(pool) => {
                let now = chrono::Utc::now().to_rfc3339();
                sqlx::query(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
                     updated_at = excluded.updated_at",
                )
                .bind(key)
                .bind(value)
                .bind(&now)
                .execute(pool)
                .await?;
                Ok(())
            }
            StoreBackend::Memory(map) => {
                let mut map = map.write().map_err(|_| poisoned())?;
                map.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    /// Delete `key` if present.
    pub async fn remove_raw(&self, key: &str) -> Result<(), AppError> {
        match self {
            StoreBackend::Sqlite(pool) => {
                sqlx::query("DELETE FROM kv WHERE key = ?")
                    .bind(key)
                    .execute(pool)
                    .await?;
                Ok(())
            }
            StoreBackend::Memory(map) => {
                let mut map = map.write().map_err(|_| poisoned())?;
                map.remove(key);
                Ok(())
            }
        }
    }

    /// Whether any value is stored under `key`.
    pub async fn contains(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.read_raw(key).await?.is_some())
    }
}

fn poisoned() -> AppError {
    AppError::Internal("Store lock poisoned".to_string())
}

/// Open (or create) the SQLite store file and run migrations.
pub async fn init_store(db_path: &Path) -> Result<StoreBackend, AppError> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(StoreBackend::Sqlite(pool))
}

/// Create the kv table if it does not exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
