//! Database operations for orders.
//!
//! Orders are written by checkout, which runs upstream of this service;
//! this repository only reads them and records commission metadata.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{CustomerId, LineItemId, OrderId, ProductId};

use super::RepositoryError;
use crate::models::{LineItem, Order};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Option<Uuid>,
    currency_code: String,
    total: Decimal,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            customer_id: row.customer_id.map(CustomerId::new),
            currency_code: row.currency_code,
            total: row.total,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Option<Uuid>,
    title: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            id: LineItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            title: row.title,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load an order together with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<(Order, Vec<LineItem>)>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, customer_id, currency_code, total, metadata, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items: Vec<LineItemRow> = sqlx::query_as(
            r"
            SELECT id, order_id, product_id, title, quantity, unit_price
            FROM order_line_item
            WHERE order_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some((
            row.into(),
            items.into_iter().map(LineItem::from).collect(),
        )))
    }

    /// Replace an order's metadata document.
    ///
    /// The commission handler merges in Rust and writes the whole
    /// document back; redelivered events rewrite the same values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_metadata(
        &self,
        id: OrderId,
        metadata: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET metadata = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(metadata)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// The upstream payment object id for an order, if one can be found.
    ///
    /// Traverses order → payment collections → payment sessions and reads
    /// the provider's `id` out of the first session's data document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn payment_intent_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<String>, RepositoryError> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            r"
            SELECT s.data->>'id'
            FROM payment_collection c
            JOIN payment_session s ON s.payment_collection_id = c.id
            WHERE c.order_id = $1
            ORDER BY c.created_at ASC, s.created_at ASC
            LIMIT 1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|(id,)| id))
    }
}
