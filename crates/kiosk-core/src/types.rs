//! # Domain Types
//!
//! Core domain types used throughout the terminal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Basket      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_no     │   │  order_num?     │   │  order_num      │       │
//! │  │  description    │◄──│  items          │──►│  status         │       │
//! │  │  price_cents    │   │                 │   │  lines          │       │
//! │  │  quantity       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The quantity field
//! `Product::quantity` is the stock level when a product comes back from the
//! stock store and the number of units held when it sits in a basket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::DEFAULT_IMAGE;

// =============================================================================
// Product
// =============================================================================

/// A product as known to the stock store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Product number - the business key (e.g. "0001").
    pub product_no: String,

    /// Description shown to the customer.
    pub description: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Stock level, or units held when in a basket.
    pub quantity: i64,
}

impl Product {
    /// Creates a product.
    pub fn new(
        product_no: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
        quantity: i64,
    ) -> Self {
        Product {
            product_no: product_no.into(),
            description: description.into(),
            price_cents,
            quantity,
        }
    }

    /// The zero-valued product returned when a lookup finds nothing.
    pub fn unknown() -> Self {
        Product::new("0", "", 0, 0)
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks that at least `amount` units are in stock.
    pub fn ensure_in_stock(&self, amount: i64) -> CoreResult<()> {
        if self.quantity >= amount {
            Ok(())
        } else {
            Err(CoreError::OutOfStock {
                product_no: self.product_no.clone(),
                available: self.quantity,
                requested: amount,
            })
        }
    }

    /// Returns a copy holding `amount` units, ready to go into a basket.
    pub fn with_quantity(&self, amount: i64) -> Self {
        Product {
            quantity: amount,
            ..self.clone()
        }
    }

    /// Status line fragment: `"<label> : <price %7.2f> (<qty %2d>) "`.
    ///
    /// ```rust
    /// use kiosk_core::Product;
    ///
    /// let p = Product::new("0001", "Toaster", 1475, 1);
    /// assert_eq!(p.summary(&p.description), "Toaster :   14.75 ( 1) ");
    /// ```
    pub fn summary(&self, label: &str) -> String {
        format!("{} : {} ({:>2}) ", label, self.price().fixed(7), self.quantity)
    }
}

// =============================================================================
// Product Image
// =============================================================================

/// Handle to a product picture.
///
/// Only the filename is stored; the front end resolves it against its
/// image directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub filename: String,
}

impl ProductImage {
    /// Creates an image handle for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        ProductImage {
            filename: filename.into(),
        }
    }

    /// Returns true if this is the placeholder picture.
    pub fn is_placeholder(&self) -> bool {
        self.filename == DEFAULT_IMAGE
    }
}

impl Default for ProductImage {
    fn default() -> Self {
        ProductImage::new(DEFAULT_IMAGE)
    }
}

// =============================================================================
// Basket
// =============================================================================

/// What happened when one unit was taken out of a basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line held more than one unit and was decremented.
    Decremented,
    /// The line held a single unit and was dropped.
    Removed,
    /// No line for that product number.
    Missing,
}

/// Ordered list of products a customer is holding.
///
/// ## Invariants
/// - `add` never merges; two checks of the same product give two lines
/// - `merge_one` keeps at most one line per product number it touches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    order_num: Option<i64>,
    items: Vec<Product>,
}

impl Basket {
    /// Creates an empty basket with no order number.
    pub fn new() -> Self {
        Basket::default()
    }

    /// Creates an empty basket tagged with an order number.
    pub fn with_order_num(order_num: i64) -> Self {
        Basket {
            order_num: Some(order_num),
            items: Vec::new(),
        }
    }

    /// The order number, if one has been allocated.
    pub fn order_num(&self) -> Option<i64> {
        self.order_num
    }

    /// Appends a line as-is.
    pub fn add(&mut self, product: Product) {
        self.items.push(product);
    }

    /// Adds one unit of `product`: bumps every matching line, or appends a
    /// single-unit line if none matches.
    pub fn merge_one(&mut self, product: &Product) {
        let mut found = false;
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.product_no == product.product_no)
        {
            item.quantity += 1;
            found = true;
        }

        if !found {
            self.items.push(product.with_quantity(1));
        }
    }

    /// Takes one unit of `product_no` out of the basket.
    pub fn remove_one(&mut self, product_no: &str) -> RemoveOutcome {
        let Some(index) = self.items.iter().position(|i| i.product_no == product_no) else {
            return RemoveOutcome::Missing;
        };

        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
            RemoveOutcome::Decremented
        } else {
            self.items.remove(index);
            RemoveOutcome::Removed
        }
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price × quantity over all lines.
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .map(|p| p.price().multiply_quantity(p.quantity))
            .sum()
    }
}

impl fmt::Display for Basket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(num) = self.order_num {
            writeln!(f, "Order number: {:03}", num)?;
        }
        for item in &self.items {
            writeln!(
                f,
                "{:<7} {:<40.40} {:>3} {}",
                item.product_no,
                item.description,
                item.quantity,
                item.price().multiply_quantity(item.quantity).fixed(7)
            )?;
        }
        if !self.items.is_empty() {
            writeln!(f, "{:<52}{}", "Total", self.total().fixed(7))?;
        }
        Ok(())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Where an order is in the packing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Reserved by a customer, not yet picked up by a packer.
    #[default]
    Waiting,
    /// A packer is working on it.
    BeingPacked,
    /// Ready for collection.
    Packed,
}

/// A reserved basket as stored by the order processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_num: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<Product>,
}

impl Order {
    /// Total value of the order.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .map(|p| p.price().multiply_quantity(p.quantity))
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tv() -> Product {
        Product::new("0001", "40 inch LED HD TV", 26900, 90)
    }

    #[test]
    fn test_summary_layout() {
        let p = Product::new("001", "Widget", 1475, 1);
        assert_eq!(p.summary("Widget"), "Widget :   14.75 ( 1) ");
        assert_eq!(tv().summary("0001"), "0001 :  269.00 (90) ");
    }

    #[test]
    fn test_unknown_product_is_zero_valued() {
        let p = Product::unknown();
        assert_eq!(p.product_no, "0");
        assert!(p.description.is_empty());
        assert_eq!(p.price_cents, 0);
        assert_eq!(p.quantity, 0);
    }

    #[test]
    fn test_ensure_in_stock() {
        assert!(tv().ensure_in_stock(1).is_ok());
        let empty = tv().with_quantity(0);
        assert!(matches!(
            empty.ensure_in_stock(1),
            Err(CoreError::OutOfStock { available: 0, .. })
        ));
    }

    #[test]
    fn test_add_does_not_merge() {
        let mut basket = Basket::new();
        basket.add(tv().with_quantity(1));
        basket.add(tv().with_quantity(1));
        assert_eq!(basket.len(), 2);
    }

    #[test]
    fn test_merge_one_increments_existing_line() {
        let mut basket = Basket::new();
        basket.merge_one(&tv());
        assert_eq!(basket.items()[0].quantity, 1);

        basket.merge_one(&tv());
        assert_eq!(basket.len(), 1);
        assert_eq!(basket.items()[0].quantity, 2);
        assert_eq!(basket.total().cents(), 53800);
    }

    #[test]
    fn test_remove_one() {
        let mut basket = Basket::new();
        basket.merge_one(&tv());
        basket.merge_one(&tv());

        assert_eq!(basket.remove_one("0001"), RemoveOutcome::Decremented);
        assert_eq!(basket.items()[0].quantity, 1);
        assert_eq!(basket.remove_one("0001"), RemoveOutcome::Removed);
        assert!(basket.is_empty());
        assert_eq!(basket.remove_one("0001"), RemoveOutcome::Missing);
    }

    #[test]
    fn test_order_number() {
        assert_eq!(Basket::new().order_num(), None);
        assert_eq!(Basket::with_order_num(9).order_num(), Some(9));
    }

    #[test]
    fn test_default_image() {
        assert!(ProductImage::default().is_placeholder());
        assert!(!ProductImage::new("pic0001.jpg").is_placeholder());
    }
}
