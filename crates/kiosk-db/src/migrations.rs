//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary, so a
//! terminal brings its own database file up to date on start-up.
//!
//! ```text
//! migrations/sqlite/
//! ├── 001_stock_schema.sql  # ProductTable, StockTable
//! └── 002_orders.sql        # OrderNumberTable, OrderTable, OrderLineTable
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations` by checksum; editing
//! one that has already shipped makes every existing database refuse to
//! start. Schema changes go in a new, higher-numbered file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database's schema is behind the embedded migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVersion {
    pub embedded: usize,
    pub applied: usize,
}

impl SchemaVersion {
    pub fn is_current(&self) -> bool {
        self.applied >= self.embedded
    }
}

/// Applies whatever the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Migrating kiosk schema");
    MIGRATOR.run(pool).await?;

    let version = schema_version(pool).await?;
    info!(applied = version.applied, "Kiosk schema current");
    Ok(())
}

/// Reads the `_sqlx_migrations` bookkeeping. Fails if nothing was ever
/// applied, because the table does not exist yet.
pub async fn schema_version(pool: &SqlitePool) -> DbResult<SchemaVersion> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok(SchemaVersion {
        embedded: MIGRATOR.migrations.len(),
        applied: usize::try_from(applied).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_second_run_applies_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.run_migrations().await.unwrap();

        let version = schema_version(db.pool()).await.unwrap();
        assert_eq!(version, SchemaVersion { embedded: 2, applied: 2 });
        assert!(version.is_current());
    }

    #[tokio::test]
    async fn test_unmigrated_database_has_no_version() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(schema_version(db.pool()).await.is_err());
    }
}
