//! Thumbnail repair command.
//!
//! For every product without a thumbnail but with at least one image,
//! promotes the first image to thumbnail. Safe to re-run.

use agora_server::db::ProductRepository;

use super::CommandError;

/// Backfill missing product thumbnails.
///
/// # Errors
///
/// Returns `CommandError` if the product scan itself fails; per-product
/// update failures are counted and reported, not fatal.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    tracing::info!("Starting thumbnail fix...");

    let candidates = products.missing_thumbnails().await?;
    tracing::info!("Found {} products without a thumbnail", candidates.len());

    let mut fixed = 0_usize;
    let mut skipped = 0_usize;
    let mut errors = 0_usize;

    for (id, title, first_image) in candidates {
        let Some(url) = first_image else {
            tracing::warn!(product = %title, "no images - skipping");
            skipped += 1;
            continue;
        };

        match products.set_thumbnail(id, &url).await {
            Ok(()) => {
                tracing::info!(product = %title, thumbnail = %url, "thumbnail set");
                fixed += 1;
            }
            Err(e) => {
                tracing::error!(product = %title, error = %e, "failed to set thumbnail");
                errors += 1;
            }
        }
    }

    tracing::info!("Done. fixed: {fixed}, skipped: {skipped}, errors: {errors}");

    if errors > 0 {
        tracing::warn!("Some thumbnails failed to update. Check errors above.");
    }

    Ok(())
}
