//! # Money
//!
//! Whole cents, so basket totals never pick up floating point drift.
//!
//! `ProductTable.price` is a decimal column; the repositories convert at the
//! boundary and nothing above them sees an `f64`.
//!
//! ```rust
//! use kiosk_core::money::Money;
//!
//! let price = Money::from_cents(1475);
//! assert_eq!(price.to_string(), "14.75");
//! assert_eq!(price.fixed(7), "  14.75");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An amount in cents.
///
/// ```text
/// ProductTable.price (REAL) ──► Product.price_cents ──► status line "  14.75"
///                                        └──────────► Basket::total()
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a stored decimal price to the nearest cent.
    pub fn from_decimal(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Decimal form, for writing a price back to `ProductTable`.
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Line value of `quantity` units at this price.
    pub const fn multiply_quantity(self, quantity: i64) -> Self {
        Money(self.0 * quantity)
    }

    /// Two decimals, right-aligned in `width` columns (`%7.2f` for width 7).
    ///
    /// Wider amounts are never truncated:
    /// ```rust
    /// use kiosk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(26900).fixed(7), " 269.00");
    /// assert_eq!(Money::from_cents(123456789).fixed(7), "1234567.89");
    /// ```
    pub fn fixed(self, width: usize) -> String {
        format!("{:>width$}", self.to_string())
    }
}

/// `units.cents` with no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_prices_round_to_cents() {
        for (price, cents) in [(14.75, 1475), (29.99, 2999), (6.99, 699), (269.0, 26900)] {
            assert_eq!(Money::from_decimal(price).cents(), cents);
            assert_eq!(Money::from_cents(cents).to_decimal(), price);
        }
    }

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_status_line_width() {
        assert_eq!(Money::from_cents(699).fixed(7), "   6.99");
        assert_eq!(Money::default().fixed(7), "   0.00");
    }

    #[test]
    fn test_basket_total() {
        let lines = [(2999, 2), (699, 1)];
        let total: Money = lines
            .iter()
            .map(|&(price, qty)| Money::from_cents(price).multiply_quantity(qty))
            .sum();
        assert_eq!(total.cents(), 6697);
    }
}
