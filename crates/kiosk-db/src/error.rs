//! # Database Errors
//!
//! ```text
//! sqlx::Error ──► DbError ──┬──► StockError  (tagged with the stock operation)
//!                           ├──► OrderError  (Storage)
//!                           └──► AppError    (start-up, in the customer app)
//! ```
//!
//! Constraint failures are classified with sqlx's [`ErrorKind`] rather than
//! by reading SQLite's message text.

use std::fmt;

use kiosk_core::{OrderError, StockError};
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Which table constraint a write broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::NotNull => "NOT NULL",
            ConstraintKind::Check => "CHECK",
        })
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    /// An UPDATE matched no row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A write broke a schema constraint (stock below zero, reused order
    /// number, line for a missing order, ...).
    #[error("{kind} constraint failed: {detail}")]
    Constraint { kind: ConstraintKind, detail: String },

    /// The database could not be reached: connect failure, closed pool,
    /// or no connection free within the acquire timeout.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Anything else SQLite or sqlx reported.
    #[error("Query failed: {0}")]
    Query(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::Unavailable(_))
    }

    /// Converts into a [`StockError`] naming the stock operation that failed.
    pub fn into_stock_error(self, operation: &'static str) -> StockError {
        if self.is_unavailable() {
            StockError::Unavailable(self.to_string())
        } else {
            StockError::query(operation, self.to_string())
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let detail = db_err.message().to_string();
                let kind = match db_err.kind() {
                    ErrorKind::UniqueViolation => ConstraintKind::Unique,
                    ErrorKind::ForeignKeyViolation => ConstraintKind::ForeignKey,
                    ErrorKind::NotNullViolation => ConstraintKind::NotNull,
                    ErrorKind::CheckViolation => ConstraintKind::Check,
                    _ => return DbError::Query(detail),
                };
                DbError::Constraint { kind, detail }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_) => DbError::Unavailable(err.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

impl From<DbError> for OrderError {
    fn from(err: DbError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[test]
    fn test_stock_error_carries_operation() {
        let err = DbError::Query("no such column: price".to_string());
        assert_eq!(
            err.into_stock_error("get_details").to_string(),
            "SQL get_details: Query failed: no such column: price"
        );
    }

    #[test]
    fn test_unavailable_maps_to_stock_unavailable() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_unavailable());
        assert!(matches!(
            err.into_stock_error("exists"),
            StockError::Unavailable(_)
        ));
    }

    #[test]
    fn test_order_error_from_db_error() {
        let err: OrderError = DbError::Transaction("busy".to_string()).into();
        assert_eq!(err.to_string(), "Order problem: Transaction failed: busy");
    }

    #[tokio::test]
    async fn test_negative_stock_is_check_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO ProductTable (productNo, description, price) VALUES ('0001', 'TV', 1.0)")
            .execute(db.pool())
            .await
            .unwrap();

        let err: DbError = sqlx::query("INSERT INTO StockTable (productNo, stockLevel) VALUES ('0001', -1)")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();

        assert!(matches!(
            err,
            DbError::Constraint { kind: ConstraintKind::Check, .. }
        ));
    }

    #[tokio::test]
    async fn test_stock_for_missing_product_is_foreign_key_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err: DbError = sqlx::query("INSERT INTO StockTable (productNo, stockLevel) VALUES ('9999', 1)")
            .execute(db.pool())
            .await
            .unwrap_err()
            .into();

        assert!(matches!(
            err,
            DbError::Constraint { kind: ConstraintKind::ForeignKey, .. }
        ));
    }
}
