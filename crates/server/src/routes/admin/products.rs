//! Vendor product creation.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use agora_core::Handle;

use crate::db::products::ProductRepository;
use crate::db::stores::StoreRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::Product;
use crate::state::AppState;

/// Request body for product creation.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: Option<String>,
    pub handle: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: Option<String>,
}

/// Single-product response envelope.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// `POST /admin/products` - create a product for the current store.
///
/// Every new handle (client-supplied or title-derived) gains a random
/// 5-character suffix so vendors can reuse titles without colliding on
/// the handle constraint. After creation the product is linked to the
/// vendor's store, and when no thumbnail was given the first image is
/// promoted to thumbnail (best-effort).
///
/// # Errors
///
/// Returns 400 when the title is missing.
pub async fn create(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let title = body
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Title is required".to_owned()))?;

    let base_handle = match body.handle.filter(|h| !h.is_empty()) {
        Some(handle) => Handle::parse(&handle),
        None => Handle::derive(&title),
    }
    .map_err(|_| AppError::BadRequest("Unable to derive a handle from this title".to_owned()))?;
    let handle = base_handle.suffixed();

    let products = ProductRepository::new(state.pool());

    let product = products
        .create(
            &title,
            handle.as_str(),
            body.thumbnail.as_deref().filter(|s| !s.is_empty()),
            body.status.as_deref().unwrap_or("published"),
        )
        .await?;

    StoreRepository::new(state.pool())
        .link_product(product.id, vendor.store.id)
        .await?;

    for (rank, url) in body.images.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        products.add_image(product.id, url, rank as i32).await?;
    }

    // Auto-fill the thumbnail from the first image. Non-critical: the
    // product is already created and linked, so a failure only logs.
    let mut product = product;
    if product.thumbnail.is_none()
        && let Some(first) = body.images.first()
    {
        match products.set_thumbnail(product.id, first).await {
            Ok(()) => product.thumbnail = Some(first.clone()),
            Err(e) => {
                tracing::error!(product_id = %product.id, error = %e, "failed to auto-set thumbnail");
            }
        }
    }

    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}
