//! # Application Error Type
//!
//! Start-up and front-end failures: configuration, database, terminal I/O
//! and malformed commands.
//!
//! Customer actions never produce an `AppError`; the model turns
//! collaborator failures into [`crate::events::CustomerEvent::Error`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config.toml unreadable ── toml::de::Error ──┐                          │
//! │  database won't open ───── DbError ──────────┼──► AppError ──► main     │
//! │  stdin closed ──────────── io::Error ────────┘     (code + message)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kiosk_db::DbError;

/// Application error with a machine-readable code.
#[derive(Debug, Clone)]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for application failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed (bad command, bad config value)
    ValidationError,

    /// Configuration file could not be read or parsed
    ConfigError,

    /// Database operation failed
    DatabaseError,

    /// Terminal or file I/O failed
    IoError,
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }
}

/// Converts database errors to application errors.
///
/// SQL detail goes to the log; the terminal only shows the short message.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                AppError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::Constraint { kind, detail } => {
                tracing::error!(%kind, %detail, "Constraint violation");
                AppError::new(ErrorCode::ValidationError, "Invalid data")
            }
            DbError::Unavailable(e) => {
                tracing::error!("Database unavailable: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            DbError::Migration(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::Transaction(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Query(e) => {
                tracing::error!("Database operation failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Invalid config file: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
