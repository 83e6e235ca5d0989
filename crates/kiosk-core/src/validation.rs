//! # Input Checks
//!
//! What the customer types is trimmed and checked here before it is bound
//! into a query. SQLite only ever sees bound parameters; description
//! searches additionally go through [`escape_like`].
//!
//! ```rust
//! use kiosk_core::validation::{validate_product_no, validate_search_query};
//!
//! assert_eq!(validate_product_no(" 0001 ").unwrap(), "0001");
//! assert_eq!(validate_search_query("  radio ").unwrap(), "radio");
//! ```

use std::ops::RangeInclusive;

use crate::error::ValidationError;
use crate::{MAX_PRODUCT_NO_LEN, MAX_QUERY_LEN};

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Stock movements accepted in one call.
pub const AMOUNT_RANGE: RangeInclusive<i64> = 1..=9999;

fn product_no_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Trims a product number and rejects anything that could not be one:
/// empty, longer than [`MAX_PRODUCT_NO_LEN`], or containing characters
/// other than letters, digits, `-` and `_`.
///
/// ```rust
/// use kiosk_core::validation::validate_product_no;
///
/// assert!(validate_product_no("0001").is_ok());
/// assert!(validate_product_no("").is_err());
/// assert!(validate_product_no("1' OR '1'='1").is_err());
/// ```
pub fn validate_product_no(input: &str) -> ValidationResult<&str> {
    const FIELD: &str = "product number";
    let product_no = input.trim();

    if product_no.is_empty() {
        return Err(ValidationError::Empty { field: FIELD });
    }
    if product_no.chars().count() > MAX_PRODUCT_NO_LEN {
        return Err(ValidationError::TooLong {
            field: FIELD,
            max: MAX_PRODUCT_NO_LEN,
        });
    }
    if let Some(ch) = product_no.chars().find(|&c| !product_no_char(c)) {
        return Err(ValidationError::BadCharacter { field: FIELD, ch });
    }

    Ok(product_no)
}

/// Trims a description search. Empty is allowed and matches everything.
pub fn validate_search_query(input: &str) -> ValidationResult<&str> {
    let query = input.trim();
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "search",
            max: MAX_QUERY_LEN,
        });
    }
    Ok(query)
}

/// Rejects stock movements outside [`AMOUNT_RANGE`].
pub fn validate_amount(amount: i64) -> ValidationResult<()> {
    if AMOUNT_RANGE.contains(&amount) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "amount",
            value: amount,
            min: *AMOUNT_RANGE.start(),
            max: *AMOUNT_RANGE.end(),
        })
    }
}

/// Backslash-escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern.
///
/// ```rust
/// use kiosk_core::validation::escape_like;
///
/// assert_eq!(escape_like("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_like(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut out, c| {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_numbers() {
        assert_eq!(validate_product_no("0001").unwrap(), "0001");
        assert_eq!(validate_product_no("  0002\t").unwrap(), "0002");
        assert!(validate_product_no("ABC-12_x").is_ok());
        assert!(validate_product_no(&"9".repeat(20)).is_ok());
    }

    #[test]
    fn test_rejected_product_numbers() {
        assert_eq!(
            validate_product_no("   "),
            Err(ValidationError::Empty { field: "product number" })
        );
        assert_eq!(
            validate_product_no("1';--"),
            Err(ValidationError::BadCharacter {
                field: "product number",
                ch: '\''
            })
        );
        assert!(matches!(
            validate_product_no("0001'; DROP TABLE StockTable; --"),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_product_no(&"9".repeat(21)),
            Err(ValidationError::TooLong { max: 20, .. })
        ));
        assert!(validate_product_no("has space").is_err());
    }

    #[test]
    fn test_search_queries() {
        assert_eq!(validate_search_query("").unwrap(), "");
        assert_eq!(validate_search_query(" Radio ").unwrap(), "Radio");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(9999).is_ok());
        for bad in [0, -3, 10_000] {
            assert!(validate_amount(bad).is_err(), "{bad} accepted");
        }
        assert_eq!(
            validate_amount(0).unwrap_err().to_string(),
            "amount must be 1 to 9999, got 0"
        );
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("radio"), "radio");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
        assert_eq!(escape_like("it's"), "it's");
    }
}
