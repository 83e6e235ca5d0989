//! # Connection Pool
//!
//! Opens the kiosk database and hands out repositories over one shared
//! `SqlitePool`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new("kiosk.db")        DbConfig::in_memory()                │
//! │    WAL, synchronous=NORMAL          one pinned connection              │
//! │    foreign keys, create file        foreign keys                       │
//! │            │                                  │                         │
//! │            └──────────────┬───────────────────┘                         │
//! │                           ▼                                             │
//! │              Database::new(config).await                                │
//! │                 connect ──► migrate (optional)                          │
//! │                           │                                             │
//! │              ┌────────────┴────────────┐                                │
//! │              ▼                         ▼                                │
//! │       db.stock()                  db.orders()                           │
//! │       StockRepository             OrderRepository                       │
//! │                                                                         │
//! │  Each repository call checks a connection out for the one statement    │
//! │  (or transaction) it runs, so concurrent terminals never share one.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::stock::StockRepository;

const MEMORY_PATH: &str = ":memory:";

/// Where the database lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kiosk/kiosk.db")
///     .max_connections(4)
///     .acquire_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Upper bound on open connections. Default: 5
    pub max_connections: u32,

    /// How long a query waits for a free connection. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// Idle connections are closed after this long. Default: 10 minutes
    pub idle_timeout: Duration,

    /// Apply pending migrations when connecting. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// File-backed database; the file is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Private database that vanishes with the pool. Used by tests.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::Unavailable(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        // Off by default in SQLite; StockTable and OrderLineTable rely on them
        Ok(options.foreign_keys(true))
    }
}

/// Handle on the kiosk database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects and, unless disabled, brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening kiosk database");

        let options = config.connect_options()?;

        let pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout);

        // The in-memory database lives exactly as long as its one connection
        let pool_options = if config.is_in_memory() {
            pool_options.idle_timeout(None).max_lifetime(None)
        } else {
            pool_options.idle_timeout(Some(config.idle_timeout))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Safe to call repeatedly.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Closes every connection; later repository calls fail as unavailable.
    pub async fn close(&self) {
        info!("Closing kiosk database");
        self.pool.close().await;
    }

    /// True if a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_healthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_file_database_is_created_and_migrated() {
        let path = std::env::temp_dir().join(format!("kiosk-pool-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(path.exists());
        assert_eq!(db.stock().count().await.unwrap(), 0);
        db.close().await;

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_skipping_migrations_leaves_schema_empty() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(db.stock().count().await.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("kiosk.db")
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(1));

        assert_eq!(config.max_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(1));
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());

        let memory = DbConfig::in_memory();
        assert!(memory.is_in_memory());
        assert_eq!(memory.max_connections, 1);
    }
}
