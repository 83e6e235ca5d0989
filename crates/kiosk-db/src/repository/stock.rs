//! # Stock Repository
//!
//! Reads and adjusts `ProductTable` / `StockTable`.
//!
//! ## Name Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer types: "radio"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  escape_like("radio") → bound as ?1                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lower(description) LIKE '%' || lower(?1) || '%' ESCAPE '\'            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  0002 | DAB Radio | 29.99 | 20    ← one row per product, with stock    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kiosk_core::error::StockResult;
use kiosk_core::validation::{escape_like, validate_amount};
use kiosk_core::{Money, Product, ProductImage, StockError, StockReadWriter, StockReader};

const PRODUCT_COLUMNS: &str = r#"
    p.productNo AS product_no,
    p.description AS description,
    CAST(ROUND(p.price * 100) AS INTEGER) AS price_cents,
    COALESCE(s.stockLevel, 0) AS quantity
"#;

/// Repository for stock reads and adjustments.
///
/// ## Usage
/// ```rust,ignore
/// let repo = StockRepository::new(pool);
/// if repo.product_exists("0001").await? {
///     let product = repo.find_by_number("0001").await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// True if a product with this exact number exists.
    pub async fn product_exists(&self, product_no: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM ProductTable WHERE productNo = ?1")
                .bind(product_no)
                .fetch_optional(&self.pool)
                .await?;

        debug!(product_no = %product_no, exists = found.is_some(), "Stock exists");
        Ok(found.is_some())
    }

    /// True if any description contains `text`, ignoring case.
    pub async fn description_exists(&self, text: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT 1 FROM ProductTable
            WHERE lower(description) LIKE '%' || lower(?1) || '%' ESCAPE '\'
            LIMIT 1
            "#,
        )
        .bind(escape_like(text))
        .fetch_optional(&self.pool)
        .await?;

        debug!(text = %text, exists = found.is_some(), "Stock exists_name");
        Ok(found.is_some())
    }

    /// Product joined with its stock level, if the product is stocked.
    pub async fn find_by_number(&self, product_no: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM ProductTable p
             INNER JOIN StockTable s ON s.productNo = p.productNo
             WHERE p.productNo = ?1"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_no)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// All products whose description contains `text`, ordered by number.
    ///
    /// Products without a stock row come back with quantity 0.
    pub async fn search_by_description(&self, text: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            r#"SELECT {PRODUCT_COLUMNS}
               FROM ProductTable p
               LEFT JOIN StockTable s ON s.productNo = p.productNo
               WHERE lower(p.description) LIKE '%' || lower(?1) || '%' ESCAPE '\'
               ORDER BY p.productNo"#
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(escape_like(text))
            .fetch_all(&self.pool)
            .await?;

        debug!(text = %text, count = products.len(), "Stock search by description");
        Ok(products)
    }

    /// Stored picture filename, if any.
    pub async fn picture(&self, product_no: &str) -> DbResult<Option<String>> {
        let picture: Option<Option<String>> =
            sqlx::query_scalar("SELECT picture FROM ProductTable WHERE productNo = ?1")
                .bind(product_no)
                .fetch_optional(&self.pool)
                .await?;

        Ok(picture.flatten().filter(|p| !p.trim().is_empty()))
    }

    /// Sets the picture filename for a product.
    pub async fn set_picture(&self, product_no: &str, filename: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE ProductTable SET picture = ?2 WHERE productNo = ?1")
            .bind(product_no)
            .bind(filename)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_no));
        }

        Ok(())
    }

    /// Decrements stock by `amount` only if that much is available.
    ///
    /// The check and the decrement happen in one statement, so two
    /// terminals can never sell the same last unit.
    pub async fn take_stock(&self, product_no: &str, amount: i64) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE StockTable
            SET stockLevel = stockLevel - ?2
            WHERE productNo = ?1 AND stockLevel >= ?2
            "#,
        )
        .bind(product_no)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        let bought = result.rows_affected() == 1;
        debug!(product_no = %product_no, amount, bought, "Stock buy");
        Ok(bought)
    }

    /// Increments stock by `amount`.
    pub async fn return_stock(&self, product_no: &str, amount: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE StockTable SET stockLevel = stockLevel + ?2 WHERE productNo = ?1",
        )
        .bind(product_no)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock", product_no));
        }

        debug!(product_no = %product_no, amount, "Stock add");
        Ok(())
    }

    /// Inserts or replaces a product and its stock level in one transaction.
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(product_no = %product.product_no, "Upserting product");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO ProductTable (productNo, description, price)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (productNo) DO UPDATE SET
                description = excluded.description,
                price = excluded.price
            "#,
        )
        .bind(&product.product_no)
        .bind(&product.description)
        .bind(Money::from_cents(product.price_cents).to_decimal())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO StockTable (productNo, stockLevel)
            VALUES (?1, ?2)
            ON CONFLICT (productNo) DO UPDATE SET stockLevel = excluded.stockLevel
            "#,
        )
        .bind(&product.product_no)
        .bind(product.quantity)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        Ok(())
    }

    /// Counts catalogue entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ProductTable")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Contract Implementations
// =============================================================================

#[async_trait]
impl StockReader for StockRepository {
    async fn exists(&self, product_no: &str) -> StockResult<bool> {
        self.product_exists(product_no)
            .await
            .map_err(|e| e.into_stock_error("exists"))
    }

    async fn exists_name(&self, text: &str) -> StockResult<bool> {
        self.description_exists(text)
            .await
            .map_err(|e| e.into_stock_error("exists_name"))
    }

    async fn get_details(&self, product_no: &str) -> StockResult<Product> {
        let product = self
            .find_by_number(product_no)
            .await
            .map_err(|e| e.into_stock_error("get_details"))?;

        Ok(product.unwrap_or_else(Product::unknown))
    }

    async fn get_details_name(&self, text: &str) -> StockResult<Vec<Product>> {
        self.search_by_description(text)
            .await
            .map_err(|e| e.into_stock_error("get_details_name"))
    }

    async fn get_image(&self, product_no: &str) -> StockResult<ProductImage> {
        let picture = self
            .picture(product_no)
            .await
            .map_err(|e| e.into_stock_error("get_image"))?;

        Ok(picture.map(ProductImage::new).unwrap_or_default())
    }
}

#[async_trait]
impl StockReadWriter for StockRepository {
    async fn buy_stock(&self, product_no: &str, amount: i64) -> StockResult<bool> {
        validate_amount(amount).map_err(|e| StockError::query("buy_stock", e.to_string()))?;

        self.take_stock(product_no, amount)
            .await
            .map_err(|e| e.into_stock_error("buy_stock"))
    }

    async fn add_stock(&self, product_no: &str, amount: i64) -> StockResult<()> {
        validate_amount(amount).map_err(|e| StockError::query("add_stock", e.to_string()))?;

        self.return_stock(product_no, amount)
            .await
            .map_err(|e| e.into_stock_error("add_stock"))
    }

    async fn modify_stock(&self, product: &Product) -> StockResult<()> {
        self.upsert(product)
            .await
            .map_err(|e| e.into_stock_error("modify_stock"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn stocked() -> StockRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stock();

        repo.upsert(&Product::new("0001", "40 inch LED HD TV", 26900, 90))
            .await
            .unwrap();
        repo.upsert(&Product::new("0002", "DAB Radio", 2999, 20))
            .await
            .unwrap();
        repo.upsert(&Product::new("0003", "Clock Radio", 1475, 0))
            .await
            .unwrap();
        repo.set_picture("0001", "pic0001.jpg").await.unwrap();

        repo
    }

    #[tokio::test]
    async fn test_exists() {
        let repo = stocked().await;
        assert!(repo.exists("0001").await.unwrap());
        assert!(!repo.exists("9999").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_treats_quotes_literally() {
        let repo = stocked().await;
        assert!(!repo.exists("0001' OR '1'='1").await.unwrap());
        assert!(!repo.exists_name("' OR 1=1 --").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_name_is_case_insensitive() {
        let repo = stocked().await;
        assert!(repo.exists_name("radio").await.unwrap());
        assert!(repo.exists_name("LED").await.unwrap());
        assert!(!repo.exists_name("toaster").await.unwrap());
    }

    #[tokio::test]
    async fn test_like_wildcards_match_literally() {
        let repo = stocked().await;
        assert!(!repo.exists_name("%").await.unwrap());
        assert!(!repo.exists_name("_").await.unwrap());
        assert!(repo.get_details_name("%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_details() {
        let repo = stocked().await;
        let product = repo.get_details("0002").await.unwrap();
        assert_eq!(product, Product::new("0002", "DAB Radio", 2999, 20));
    }

    #[tokio::test]
    async fn test_get_details_missing_is_zero_valued() {
        let repo = stocked().await;
        assert_eq!(repo.get_details("4242").await.unwrap(), Product::unknown());
    }

    #[tokio::test]
    async fn test_get_details_name_returns_every_match() {
        let repo = stocked().await;
        let products = repo.get_details_name("Radio").await.unwrap();

        let numbers: Vec<&str> = products.iter().map(|p| p.product_no.as_str()).collect();
        assert_eq!(numbers, vec!["0002", "0003"]);
        assert_eq!(products[1].price_cents, 1475);
        assert_eq!(products[1].quantity, 0);
    }

    #[tokio::test]
    async fn test_get_details_name_empty_text_matches_all() {
        let repo = stocked().await;
        assert_eq!(repo.get_details_name("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_image() {
        let repo = stocked().await;
        assert_eq!(
            repo.get_image("0001").await.unwrap(),
            ProductImage::new("pic0001.jpg")
        );
        assert!(repo.get_image("0002").await.unwrap().is_placeholder());
        assert!(repo.get_image("9999").await.unwrap().is_placeholder());
    }

    #[tokio::test]
    async fn test_buy_stock_never_goes_negative() {
        let repo = stocked().await;

        assert!(repo.buy_stock("0002", 1).await.unwrap());
        assert_eq!(repo.get_details("0002").await.unwrap().quantity, 19);

        assert!(!repo.buy_stock("0002", 20).await.unwrap());
        assert_eq!(repo.get_details("0002").await.unwrap().quantity, 19);

        assert!(!repo.buy_stock("0003", 1).await.unwrap());
        assert!(!repo.buy_stock("9999", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_buy_stock_rejects_bad_amount() {
        let repo = stocked().await;
        let err = repo.buy_stock("0002", 0).await.unwrap_err();
        assert!(err.to_string().starts_with("SQL buy_stock:"));
    }

    #[tokio::test]
    async fn test_add_stock() {
        let repo = stocked().await;
        repo.add_stock("0003", 5).await.unwrap();
        assert_eq!(repo.get_details("0003").await.unwrap().quantity, 5);

        let err = repo.add_stock("9999", 1).await.unwrap_err();
        assert_eq!(
            err,
            StockError::query("add_stock", "Stock not found: 9999")
        );
    }

    #[tokio::test]
    async fn test_modify_stock_replaces_existing() {
        let repo = stocked().await;
        repo.modify_stock(&Product::new("0002", "DAB+ Radio", 3499, 7))
            .await
            .unwrap();

        assert_eq!(
            repo.get_details("0002").await.unwrap(),
            Product::new("0002", "DAB+ Radio", 3499, 7)
        );
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_closed_pool_reports_unavailable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.stock();
        db.close().await;

        assert!(matches!(
            repo.exists("0001").await,
            Err(StockError::Unavailable(_))
        ));
    }
}
