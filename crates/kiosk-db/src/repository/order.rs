//! # Order Repository
//!
//! Reserved baskets and their packing status.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. ALLOCATE                                                           │
//! │     └── unique_number() → row in OrderNumberTable                      │
//! │                                                                         │
//! │  2. RESERVE                                                            │
//! │     └── new_order(basket) → OrderTable { status: waiting }             │
//! │                            + one OrderLineTable row per basket line    │
//! │                                                                         │
//! │  3. PACK                                                               │
//! │     └── set_status(n, BeingPacked) → set_status(n, Packed)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use kiosk_core::error::OrderResult;
use kiosk_core::{Basket, Order, OrderError, OrderProcessor, OrderStatus, Product};

/// Header row of `OrderTable`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_num: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Allocates the next order number.
    pub async fn allocate_number(&self) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO OrderNumberTable DEFAULT VALUES")
            .execute(&self.pool)
            .await?;

        let order_num = result.last_insert_rowid();
        debug!(order_num, "Allocated order number");
        Ok(order_num)
    }

    /// Writes an order header and its lines in one transaction.
    ///
    /// The basket must already carry an order number and at least one line.
    pub async fn insert(&self, order_num: i64, basket: &Basket) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        sqlx::query(
            "INSERT INTO OrderTable (orderNum, status, createdAt) VALUES (?1, ?2, ?3)",
        )
        .bind(order_num)
        .bind(OrderStatus::Waiting)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for (line_no, product) in basket.items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO OrderLineTable
                    (orderNum, lineNo, productNo, description, priceCents, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(order_num)
            .bind(line_no as i64)
            .bind(&product.product_no)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(product.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;

        info!(order_num, lines = basket.len(), "Order stored");
        Ok(())
    }

    /// Gets an order with its lines.
    pub async fn get_order(&self, order_num: i64) -> DbResult<Option<Order>> {
        let header: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT orderNum AS order_num, status, createdAt AS created_at
            FROM OrderTable
            WHERE orderNum = ?1
            "#,
        )
        .bind(order_num)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let lines: Vec<Product> = sqlx::query_as(
            r#"
            SELECT productNo AS product_no, description,
                   priceCents AS price_cents, quantity
            FROM OrderLineTable
            WHERE orderNum = ?1
            ORDER BY lineNo
            "#,
        )
        .bind(order_num)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Order {
            order_num: header.order_num,
            status: header.status,
            created_at: header.created_at,
            lines,
        }))
    }

    /// Order numbers in the given status, oldest first.
    pub async fn with_status(&self, status: OrderStatus) -> DbResult<Vec<i64>> {
        let numbers: Vec<i64> = sqlx::query_scalar(
            "SELECT orderNum FROM OrderTable WHERE status = ?1 ORDER BY orderNum",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers)
    }

    /// Order numbers still waiting for a packer, oldest first.
    pub async fn waiting_orders(&self) -> DbResult<Vec<i64>> {
        self.with_status(OrderStatus::Waiting).await
    }

    /// Moves an order along the packing pipeline.
    pub async fn set_status(&self, order_num: i64, status: OrderStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE OrderTable SET status = ?2 WHERE orderNum = ?1")
            .bind(order_num)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_num.to_string()));
        }

        debug!(order_num, ?status, "Order status changed");
        Ok(())
    }
}

#[async_trait]
impl OrderProcessor for OrderRepository {
    async fn unique_number(&self) -> OrderResult<i64> {
        Ok(self.allocate_number().await?)
    }

    async fn new_order(&self, basket: &Basket) -> OrderResult<i64> {
        let order_num = match basket.order_num() {
            Some(n) => n,
            None => self.allocate_number().await?,
        };

        if basket.is_empty() {
            return Err(OrderError::Empty(order_num));
        }

        self.insert(order_num, basket).await?;
        Ok(order_num)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn orders() -> OrderRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().orders()
    }

    fn basket(order_num: Option<i64>) -> Basket {
        let mut basket = match order_num {
            Some(n) => Basket::with_order_num(n),
            None => Basket::new(),
        };
        basket.merge_one(&Product::new("0002", "DAB Radio", 2999, 20));
        basket.merge_one(&Product::new("0002", "DAB Radio", 2999, 20));
        basket.merge_one(&Product::new("0004", "Watch", 2999, 10));
        basket
    }

    #[tokio::test]
    async fn test_unique_numbers_never_repeat() {
        let repo = orders().await;
        let first = repo.unique_number().await.unwrap();
        let second = repo.unique_number().await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_new_order_keeps_basket_number() {
        let repo = orders().await;
        let num = repo.unique_number().await.unwrap();

        assert_eq!(repo.new_order(&basket(Some(num))).await.unwrap(), num);

        let order = repo.get_order(num).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Waiting);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].product_no, "0002");
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.total().cents(), 2999 * 3);
    }

    #[tokio::test]
    async fn test_new_order_allocates_missing_number() {
        let repo = orders().await;
        let num = repo.new_order(&basket(None)).await.unwrap();
        assert!(repo.get_order(num).await.unwrap().is_some());
        assert!(repo.unique_number().await.unwrap() > num);
    }

    #[tokio::test]
    async fn test_empty_basket_is_rejected() {
        let repo = orders().await;
        let err = repo.new_order(&Basket::with_order_num(9)).await.unwrap_err();
        assert_eq!(err, OrderError::Empty(9));
        assert!(repo.get_order(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_number_cannot_be_reserved_twice() {
        let repo = orders().await;
        let num = repo.unique_number().await.unwrap();
        repo.new_order(&basket(Some(num))).await.unwrap();

        assert!(matches!(
            repo.new_order(&basket(Some(num))).await,
            Err(OrderError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_packing_status_flow() {
        let repo = orders().await;
        let first = repo.new_order(&basket(None)).await.unwrap();
        let second = repo.new_order(&basket(None)).await.unwrap();
        assert_eq!(repo.waiting_orders().await.unwrap(), vec![first, second]);

        repo.set_status(first, OrderStatus::BeingPacked).await.unwrap();
        assert_eq!(repo.waiting_orders().await.unwrap(), vec![second]);

        repo.set_status(first, OrderStatus::Packed).await.unwrap();
        assert_eq!(
            repo.with_status(OrderStatus::Packed).await.unwrap(),
            vec![first]
        );

        assert!(matches!(
            repo.set_status(404, OrderStatus::Packed).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
