//! # Customer Events
//!
//! What the model tells its observers after every action.
//!
//! The tag says how the action went; the message is the status line shown
//! to the customer. Observers never have to inspect the text to tell a
//! missing product from a broken database.

use std::fmt;

/// Outcome of one customer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerEvent {
    /// The action did what was asked.
    Success(String),

    /// The product (or query) matched nothing usable.
    NotFound(String),

    /// The action is not allowed in the current state.
    Rejected(String),

    /// A collaborator failed; the message is its error text.
    Error(String),
}

impl CustomerEvent {
    /// The status line text.
    pub fn message(&self) -> &str {
        match self {
            CustomerEvent::Success(m)
            | CustomerEvent::NotFound(m)
            | CustomerEvent::Rejected(m)
            | CustomerEvent::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CustomerEvent::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CustomerEvent::Error(_))
    }
}

impl fmt::Display for CustomerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerEvent::Error(m) => write!(f, "!! {}", m),
            other => f.write_str(other.message()),
        }
    }
}
