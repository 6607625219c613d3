//! Brand↔product link steps.
//!
//! Two symmetric steps over the `product_brand` relation. The link step
//! records its own undo into the caller's [`Compensations`] stack, so a
//! multi-step flow that links a brand and then fails later rolls the
//! relation back; the unlink step needs no compensation of its own.

use sqlx::PgPool;

use agora_core::{BrandId, ProductId};

use crate::db::RepositoryError;
use crate::db::brands::BrandRepository;
use crate::services::saga::Compensations;

/// Link a product to a brand, recording the reversing unlink.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the exact link already exists.
pub async fn link_step(
    pool: &PgPool,
    saga: &mut Compensations,
    product_id: ProductId,
    brand_id: BrandId,
) -> Result<(), RepositoryError> {
    BrandRepository::new(pool)
        .link_product(product_id, brand_id)
        .await?;

    let pool = pool.clone();
    saga.record("unlink-product-from-brand", async move {
        BrandRepository::new(&pool)
            .unlink_product(product_id, brand_id)
            .await
    });

    Ok(())
}

/// Unlink a product from a brand.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn unlink_step(
    pool: &PgPool,
    product_id: ProductId,
    brand_id: BrandId,
) -> Result<(), RepositoryError> {
    BrandRepository::new(pool)
        .unlink_product(product_id, brand_id)
        .await
}

/// Replace whatever brand a product is linked to with `brand_id`.
///
/// Existing links are removed first; application logic, not a schema
/// constraint, is what keeps products at one brand. The new link runs as
/// a compensated step so the relation is consistent under rollback.
///
/// # Errors
///
/// Returns `RepositoryError` if removing old links or creating the new
/// one fails.
pub async fn set_product_brand(
    pool: &PgPool,
    product_id: ProductId,
    brand_id: BrandId,
) -> Result<(), RepositoryError> {
    let brands = BrandRepository::new(pool);

    let removed = brands.unlink_all_for_product(product_id).await?;
    if !removed.is_empty() {
        tracing::debug!(
            product_id = %product_id,
            removed = removed.len(),
            "removed existing brand links"
        );
    }

    let mut saga = Compensations::new();
    match link_step(pool, &mut saga, product_id, brand_id).await {
        Ok(()) => {
            saga.commit();
            Ok(())
        }
        Err(e) => {
            saga.unwind().await;
            Err(e)
        }
    }
}

/// Remove every brand link a product has.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn clear_product_brand(
    pool: &PgPool,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    let removed = BrandRepository::new(pool)
        .unlink_all_for_product(product_id)
        .await?;

    for brand_id in removed {
        tracing::debug!(product_id = %product_id, brand_id = %brand_id, "brand link removed");
    }

    Ok(())
}
