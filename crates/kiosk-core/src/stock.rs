//! # Collaborator Contracts
//!
//! The customer model talks to the outside world only through these traits.
//! `kiosk-db` provides SQLite implementations; tests provide in-memory ones.
//!
//! ```text
//! ┌──────────────────┐   exists / get_details / ...   ┌───────────────────┐
//! │  CustomerModel   │ ─────────────────────────────► │ StockReadWriter   │
//! │                  │                                 └───────────────────┘
//! │                  │   unique_number / new_order    ┌───────────────────┐
//! │                  │ ─────────────────────────────► │ OrderProcessor    │
//! └──────────────────┘                                 └───────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::{OrderResult, StockResult};
use crate::types::{Basket, Product, ProductImage};

/// Read access to the stock list.
#[async_trait]
pub trait StockReader: Send + Sync {
    /// True if a product with exactly this number exists.
    async fn exists(&self, product_no: &str) -> StockResult<bool>;

    /// True if any product description contains `text` (case-insensitive).
    async fn exists_name(&self, text: &str) -> StockResult<bool>;

    /// Number, description, price and stock level of one product.
    ///
    /// Returns [`Product::unknown`] when the product does not exist.
    async fn get_details(&self, product_no: &str) -> StockResult<Product>;

    /// Every product whose description contains `text`
    /// (case-insensitive), one entry per product number.
    async fn get_details_name(&self, text: &str) -> StockResult<Vec<Product>>;

    /// The product's picture, or the placeholder if it has none.
    async fn get_image(&self, product_no: &str) -> StockResult<ProductImage>;
}

/// Read and write access to the stock list.
#[async_trait]
pub trait StockReadWriter: StockReader {
    /// Takes `amount` units out of stock.
    ///
    /// Returns `false` without changing anything if fewer than `amount`
    /// units are available.
    async fn buy_stock(&self, product_no: &str, amount: i64) -> StockResult<bool>;

    /// Puts `amount` units back into stock.
    async fn add_stock(&self, product_no: &str, amount: i64) -> StockResult<()>;

    /// Creates or replaces a product together with its stock level.
    async fn modify_stock(&self, product: &Product) -> StockResult<()>;
}

/// Accepts reserved baskets as orders.
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    /// Allocates a fresh order number. Numbers are never handed out twice.
    async fn unique_number(&self) -> OrderResult<i64>;

    /// Stores the basket as a new waiting order.
    ///
    /// A basket without an order number gets one allocated.
    /// Returns the order number used.
    async fn new_order(&self, basket: &Basket) -> OrderResult<i64>;
}
