//! # kiosk-core: Domain Types for the Customer Terminal
//!
//! Pure types and contracts shared by the database layer and the customer
//! application. Nothing in here touches a database, a file or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kiosk Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Customer app (model + controller)                  │   │
//! │  │      check ──► verify ──► buy ──► remove ──► reserve           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ StockReadWriter / OrderProcessor       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosk-core (THIS CRATE) ★                       │   │
//! │  │   types: Product, Basket, ProductImage, Order                   │   │
//! │  │   money: Money (integer cents)                                  │   │
//! │  │   stock: collaborator traits                                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ implemented by                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 kiosk-db (SQLite repositories)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Basket, Order, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`stock`] - Stock and order collaborator traits
//!
//! ## Example Usage
//!
//! ```rust
//! use kiosk_core::{Basket, Product};
//!
//! let mut basket = Basket::new();
//! basket.merge_one(&Product::new("0001", "40 inch LED HD TV", 26900, 1));
//! basket.merge_one(&Product::new("0001", "40 inch LED HD TV", 26900, 1));
//! assert_eq!(basket.len(), 1);
//! assert_eq!(basket.items()[0].quantity, 2);
//! ```

pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, OrderError, StockError, ValidationError};
pub use money::Money;
pub use stock::{OrderProcessor, StockReadWriter, StockReader};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Picture shown when a product has no image on file.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// Longest product number accepted from a customer.
pub const MAX_PRODUCT_NO_LEN: usize = 20;

/// Longest description search accepted from a customer.
pub const MAX_QUERY_LEN: usize = 100;
