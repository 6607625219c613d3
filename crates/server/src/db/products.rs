//! Database operations for products, their images, and public listings.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{BrandId, ProductId, StoreId};

use super::RepositoryError;
use crate::models::product::ProductImage;
use crate::models::{Product, ProductWithStore, StoreSummary};

/// Filter parameters for product listings.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Case-insensitive substring match on title.
    pub q: Option<String>,
    pub ids: Option<Vec<ProductId>>,
    pub collection_id: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<BrandId>,
    pub store_id: Option<StoreId>,
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    handle: String,
    thumbnail: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            handle: row.handle,
            thumbnail: row.thumbnail,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Listing row: product columns plus the (optional) owning store join.
#[derive(Debug, sqlx::FromRow)]
struct ProductListingRow {
    id: Uuid,
    title: String,
    handle: String,
    thumbnail: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    store_id: Option<Uuid>,
    store_name: Option<String>,
    store_metadata: Option<serde_json::Value>,
}

impl From<ProductListingRow> for ProductWithStore {
    fn from(row: ProductListingRow) -> Self {
        let store = match (row.store_id, row.store_name) {
            (Some(id), Some(name)) => Some(StoreSummary {
                id: StoreId::new(id),
                name,
                metadata: row.store_metadata.unwrap_or_else(|| serde_json::json!({})),
            }),
            _ => None,
        };

        Self {
            product: Product {
                id: ProductId::new(row.id),
                title: row.title,
                handle: row.handle,
                thumbnail: row.thumbnail,
                status: row.status,
                created_at: row.created_at,
            },
            store,
            images: Vec::new(),
        }
    }
}

const LISTING_FILTER: &str = r"
    p.deleted_at IS NULL
    AND ($1::text IS NULL OR p.title ILIKE $1)
    AND ($2::uuid[] IS NULL OR p.id = ANY($2))
    AND ($3::text IS NULL OR p.collection_id = $3)
    AND ($4::text IS NULL OR p.category_id = $4)
    AND ($5::uuid IS NULL OR EXISTS (
        SELECT 1 FROM product_brand pb
        WHERE pb.product_id = p.id AND pb.brand_id = $5))
    AND ($6::uuid IS NULL OR ps.store_id = $6)
";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a handle collision (the
    /// random suffix makes this unlikely, not impossible).
    pub async fn create(
        &self,
        title: &str,
        handle: &str,
        thumbnail: Option<&str>,
        status: &str,
    ) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(
            r"
            INSERT INTO product (id, title, handle, thumbnail, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, handle, thumbnail, status, created_at
            ",
        )
        .bind(ProductId::generate())
        .bind(title)
        .bind(handle)
        .bind(thumbnail)
        .bind(status)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "A product with this handle already exists"))?;

        Ok(row.into())
    }

    /// Get a non-deleted product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, title, handle, thumbnail, status, created_at
            FROM product
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Attach an image to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_image(
        &self,
        product_id: ProductId,
        url: &str,
        rank: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_image (id, product_id, url, rank)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(url)
        .bind(rank)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The image URLs of a product, in rank order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let rows: Vec<(String, i32)> = sqlx::query_as(
            r"
            SELECT url, rank
            FROM product_image
            WHERE product_id = $1
            ORDER BY rank ASC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(url, rank)| ProductImage { url, rank })
            .collect())
    }

    /// Set a product's thumbnail.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_thumbnail(&self, id: ProductId, url: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE product
            SET thumbnail = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(url)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Public product listing, newest first, each product carrying its
    /// owning store and images, plus the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProductWithStore>, i64), RepositoryError> {
        let q_pattern = filter.q.as_ref().map(|q| format!("%{q}%"));
        let id_values: Option<Vec<Uuid>> = filter
            .ids
            .as_ref()
            .map(|ids| ids.iter().map(|id| id.as_uuid()).collect());

        let rows: Vec<ProductListingRow> = sqlx::query_as(&format!(
            r"
            SELECT p.id, p.title, p.handle, p.thumbnail, p.status, p.created_at,
                   s.id AS store_id, s.name AS store_name, s.metadata AS store_metadata
            FROM product p
            LEFT JOIN product_store ps ON ps.product_id = p.id
            LEFT JOIN store s ON s.id = ps.store_id AND s.deleted_at IS NULL
            WHERE {LISTING_FILTER}
            ORDER BY p.created_at DESC
            LIMIT $7 OFFSET $8
            "
        ))
        .bind(&q_pattern)
        .bind(&id_values)
        .bind(&filter.collection_id)
        .bind(&filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.store_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (count,): (i64,) = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*)
            FROM product p
            LEFT JOIN product_store ps ON ps.product_id = p.id
            WHERE {LISTING_FILTER}
            "
        ))
        .bind(&q_pattern)
        .bind(&id_values)
        .bind(&filter.collection_id)
        .bind(&filter.category_id)
        .bind(filter.brand_id)
        .bind(filter.store_id)
        .fetch_one(self.pool)
        .await?;

        let mut products: Vec<ProductWithStore> =
            rows.into_iter().map(ProductWithStore::from).collect();

        for product in &mut products {
            product.images = self.images(product.product.id).await?;
        }

        Ok((products, count))
    }

    /// Products with no thumbnail, paired with their first image URL when
    /// one exists. Used by the thumbnail-repair maintenance command.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn missing_thumbnails(
        &self,
    ) -> Result<Vec<(ProductId, String, Option<String>)>, RepositoryError> {
        let rows: Vec<(Uuid, String, Option<String>)> = sqlx::query_as(
            r"
            SELECT p.id, p.title,
                   (SELECT url FROM product_image i
                    WHERE i.product_id = p.id
                    ORDER BY i.rank ASC LIMIT 1) AS first_image
            FROM product p
            WHERE p.deleted_at IS NULL AND p.thumbnail IS NULL
            ORDER BY p.created_at ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, url)| (ProductId::new(id), title, url))
            .collect())
    }
}
