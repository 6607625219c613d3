//! Database operations for stores and their association tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{CustomerId, OrderId, ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::{Store, StoreSummary};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    name: String,
    owner_user_id: Uuid,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            owner_user_id: UserId::new(row.owner_user_id),
            metadata: row.metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoreSummaryRow {
    id: Uuid,
    name: String,
    metadata: serde_json::Value,
}

impl From<StoreSummaryRow> for StoreSummary {
    fn from(row: StoreSummaryRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            metadata: row.metadata,
        }
    }
}

const STORE_COLUMNS: &str = "id, name, owner_user_id, metadata, created_at, updated_at";

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str, owner: UserId) -> Result<Store, RepositoryError> {
        let row: StoreRow = sqlx::query_as(&format!(
            r"
            INSERT INTO store (id, name, owner_user_id, metadata)
            VALUES ($1, $2, $3, '{{}}'::jsonb)
            RETURNING {STORE_COLUMNS}
            "
        ))
        .bind(StoreId::generate())
        .bind(name)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Hard-delete a store (saga compensation path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM store WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Get a non-deleted store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            r"
            SELECT {STORE_COLUMNS}
            FROM store
            WHERE id = $1 AND deleted_at IS NULL
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Store::from))
    }

    /// Get the store owned by a user ("store context" for vendor routes).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner: UserId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            r"
            SELECT {STORE_COLUMNS}
            FROM store
            WHERE owner_user_id = $1 AND deleted_at IS NULL
            "
        ))
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Store::from))
    }

    /// Public store listing, newest first, plus the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        q: Option<&str>,
        ids: Option<&[StoreId]>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StoreSummary>, i64), RepositoryError> {
        let q_pattern = q.map(|q| format!("%{q}%"));
        let id_values: Option<Vec<Uuid>> =
            ids.map(|ids| ids.iter().map(|id| id.as_uuid()).collect());

        let rows: Vec<StoreSummaryRow> = sqlx::query_as(
            r"
            SELECT id, name, metadata
            FROM store
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::uuid[] IS NULL OR id = ANY($2))
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(&q_pattern)
        .bind(&id_values)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM store
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::uuid[] IS NULL OR id = ANY($2))
            ",
        )
        .bind(&q_pattern)
        .bind(&id_values)
        .fetch_one(self.pool)
        .await?;

        Ok((rows.into_iter().map(StoreSummary::from).collect(), count))
    }

    /// Replace a store's metadata document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    pub async fn update_metadata(
        &self,
        id: StoreId,
        metadata: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE store
            SET metadata = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
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

    // =========================================================================
    // Association tables
    // =========================================================================

    /// Link a product to its owning store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already linked.
    pub async fn link_product(
        &self,
        product_id: ProductId,
        store_id: StoreId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_store (product_id, store_id)
            VALUES ($1, $2)
            ",
        )
        .bind(product_id)
        .bind(store_id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Product is already linked to a store"))?;

        Ok(())
    }

    /// The store that owns a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn store_of_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StoreSummary>, RepositoryError> {
        let row: Option<StoreSummaryRow> = sqlx::query_as(
            r"
            SELECT s.id, s.name, s.metadata
            FROM product_store ps
            JOIN store s ON s.id = ps.store_id AND s.deleted_at IS NULL
            WHERE ps.product_id = $1
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(StoreSummary::from))
    }

    /// Resolve the owning store for a set of products.
    ///
    /// Returns the store of the first matching relation row; orders mixing
    /// products from multiple stores resolve to whichever store matches
    /// first. Kept as-is deliberately (see DESIGN.md).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first_store_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Option<StoreId>, RepositoryError> {
        let ids: Vec<Uuid> = product_ids.iter().map(|id| id.as_uuid()).collect();

        let row: Option<(Uuid,)> = sqlx::query_as(
            r"
            SELECT store_id
            FROM product_store
            WHERE product_id = ANY($1)
            ORDER BY created_at ASC
            LIMIT 1
            ",
        )
        .bind(&ids)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id,)| StoreId::new(id)))
    }

    /// Link an order to its owning store (idempotent upsert).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn link_order(
        &self,
        order_id: OrderId,
        store_id: StoreId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO order_store (order_id, store_id)
            VALUES ($1, $2)
            ON CONFLICT (order_id) DO UPDATE SET store_id = EXCLUDED.store_id
            ",
        )
        .bind(order_id)
        .bind(store_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Link a customer to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair is already linked;
    /// callers decide whether a duplicate is tolerable.
    pub async fn link_customer(
        &self,
        customer_id: CustomerId,
        store_id: StoreId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO customer_store (customer_id, store_id)
            VALUES ($1, $2)
            ",
        )
        .bind(customer_id)
        .bind(store_id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Customer is already linked to this store"))?;

        Ok(())
    }
}
