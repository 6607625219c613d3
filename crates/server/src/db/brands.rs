//! Database operations for brands and the product↔brand link.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{BrandId, ProductId};

use super::RepositoryError;
use crate::models::Brand;

const HANDLE_CONFLICT: &str = "A brand with this handle already exists";

/// Filter parameters for brand listings.
#[derive(Debug, Default, Clone)]
pub struct BrandFilter {
    /// Case-insensitive substring match on name.
    pub q: Option<String>,
    /// Exact handle match.
    pub handle: Option<String>,
}

/// Fields accepted by a partial brand update.
#[derive(Debug, Default, Clone)]
pub struct BrandPatch {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub logo_url: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct BrandRow {
    id: Uuid,
    name: String,
    handle: String,
    logo_url: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: BrandId::new(row.id),
            name: row.name,
            handle: row.handle,
            logo_url: row.logo_url,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BRAND_COLUMNS: &str = "id, name, handle, logo_url, description, created_at, updated_at";

/// Repository for brand database operations.
pub struct BrandRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepository<'a> {
    /// Create a new brand repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List non-deleted brands ordered by name, plus the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &BrandFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Brand>, i64), RepositoryError> {
        let q_pattern = filter.q.as_ref().map(|q| format!("%{q}%"));

        let rows: Vec<BrandRow> = sqlx::query_as(&format!(
            r"
            SELECT {BRAND_COLUMNS}
            FROM brand
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR handle = $2)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(&q_pattern)
        .bind(&filter.handle)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM brand
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR handle = $2)
            ",
        )
        .bind(&q_pattern)
        .bind(&filter.handle)
        .fetch_one(self.pool)
        .await?;

        Ok((rows.into_iter().map(Brand::from).collect(), count))
    }

    /// Get a non-deleted brand by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BrandId) -> Result<Option<Brand>, RepositoryError> {
        let row: Option<BrandRow> = sqlx::query_as(&format!(
            r"
            SELECT {BRAND_COLUMNS}
            FROM brand
            WHERE id = $1 AND deleted_at IS NULL
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Brand::from))
    }

    /// Create a new brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the handle is already taken.
    pub async fn create(
        &self,
        name: &str,
        handle: &str,
        logo_url: Option<&str>,
        description: Option<&str>,
    ) -> Result<Brand, RepositoryError> {
        let row: BrandRow = sqlx::query_as(&format!(
            r"
            INSERT INTO brand (id, name, handle, logo_url, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BRAND_COLUMNS}
            "
        ))
        .bind(BrandId::generate())
        .bind(name)
        .bind(handle)
        .bind(logo_url)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, HANDLE_CONFLICT))?;

        Ok(row.into())
    }

    /// Partially update a brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the brand doesn't exist and
    /// `RepositoryError::Conflict` on a handle collision.
    pub async fn update(&self, id: BrandId, patch: BrandPatch) -> Result<Brand, RepositoryError> {
        let row: Option<BrandRow> = sqlx::query_as(&format!(
            r"
            UPDATE brand
            SET name = COALESCE($2, name),
                handle = COALESCE($3, handle),
                logo_url = CASE WHEN $4 THEN $5 ELSE logo_url END,
                description = CASE WHEN $6 THEN $7 ELSE description END,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {BRAND_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.handle)
        .bind(patch.logo_url.is_some())
        .bind(patch.logo_url.flatten())
        .bind(patch.description.is_some())
        .bind(patch.description.flatten())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, HANDLE_CONFLICT))?;

        row.map(Brand::from).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the brand doesn't exist.
    pub async fn soft_delete(&self, id: BrandId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE brand
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Product↔brand link
    // =========================================================================

    /// Get the brand currently linked to a product, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn brand_of_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Brand>, RepositoryError> {
        let row: Option<BrandRow> = sqlx::query_as(
            r"
            SELECT b.id, b.name, b.handle, b.logo_url, b.description,
                   b.created_at, b.updated_at
            FROM product_brand pb
            JOIN brand b ON b.id = pb.brand_id AND b.deleted_at IS NULL
            WHERE pb.product_id = $1
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Brand::from))
    }

    /// Insert a product→brand link row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the exact link already exists.
    pub async fn link_product(
        &self,
        product_id: ProductId,
        brand_id: BrandId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_brand (product_id, brand_id)
            VALUES ($1, $2)
            ",
        )
        .bind(product_id)
        .bind(brand_id)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Product is already linked to this brand"))?;

        Ok(())
    }

    /// Remove one specific product→brand link row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unlink_product(
        &self,
        product_id: ProductId,
        brand_id: BrandId,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM product_brand
            WHERE product_id = $1 AND brand_id = $2
            ",
        )
        .bind(product_id)
        .bind(brand_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove every brand link for a product, returning the brand ids that
    /// were linked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unlink_all_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<BrandId>, RepositoryError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r"
            DELETE FROM product_brand
            WHERE product_id = $1
            RETURNING brand_id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| BrandId::new(id)).collect())
    }
}
