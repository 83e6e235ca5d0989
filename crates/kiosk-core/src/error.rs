//! # Error Types
//!
//! ```text
//! StockReadWriter ──► StockError ─┐
//! OrderProcessor ───► OrderError ─┴──► CustomerModel ──► CustomerEvent::Error
//!
//! validation.rs ────► ValidationError ──► CoreError (rules on Product)
//! ```
//!
//! `StockError` and `OrderError` text reaches the customer's status line
//! unchanged, so it stays short and names what failed.

use thiserror::Error;

/// Failure reported by a [`crate::StockReader`] or [`crate::StockReadWriter`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    /// A statement against the stock tables failed.
    #[error("SQL {operation}: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    /// The stock store could not be reached at all.
    #[error("SQL problem: {0}")]
    Unavailable(String),
}

impl StockError {
    pub fn query(operation: &'static str, message: impl Into<String>) -> Self {
        StockError::Query {
            operation,
            message: message.into(),
        }
    }
}

pub type StockResult<T> = Result<T, StockError>;

/// Failure reported by an [`crate::OrderProcessor`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order problem: {0}")]
    Storage(String),

    /// A basket with nothing in it was handed over for packing.
    #[error("Order {0} has no items")]
    Empty(i64),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// A product rule was broken.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{product_no} is out of stock: {available} left, {requested} wanted")]
    OutOfStock {
        product_no: String,
        available: i64,
        requested: i64,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Customer input that cannot be looked up as typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be {min} to {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{field} may not contain {ch:?}")]
    BadCharacter { field: &'static str, ch: char },
}
