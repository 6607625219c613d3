//! Product↔brand link management.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use agora_core::{BrandId, ProductId};

use crate::db::brands::BrandRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::Brand;
use crate::services::product_brand;
use crate::state::AppState;

/// Response carrying a product's brand (or null).
#[derive(Debug, Serialize)]
pub struct ProductBrandResponse {
    pub brand: Option<Brand>,
}

/// `GET /admin/products/{id}/brand` - the product's current brand.
///
/// Lookup failures degrade to `{"brand": null}` rather than erroring;
/// the widget calling this treats "no brand" and "couldn't resolve"
/// identically.
pub async fn get(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Json<ProductBrandResponse> {
    let brand = match BrandRepository::new(state.pool())
        .brand_of_product(product_id)
        .await
    {
        Ok(brand) => brand,
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "brand lookup failed");
            None
        }
    };

    Json(ProductBrandResponse { brand })
}

/// Request body for setting a product's brand.
#[derive(Debug, Deserialize)]
pub struct SetBrandRequest {
    pub brand_id: Option<BrandId>,
}

/// Response for a successful link change.
#[derive(Debug, Serialize)]
pub struct SetBrandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<BrandRef>,
}

/// Minimal brand reference echoed back after linking.
#[derive(Debug, Serialize)]
pub struct BrandRef {
    pub id: BrandId,
}

/// `POST /admin/products/{id}/brand` - set the product's brand.
///
/// Any existing link is removed first; one brand per product is enforced
/// here, not by the schema.
///
/// # Errors
///
/// Returns 400 when `brand_id` is missing or the link cannot be created.
pub async fn set(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<SetBrandRequest>,
) -> Result<Json<SetBrandResponse>> {
    let brand_id = body
        .brand_id
        .ok_or_else(|| AppError::BadRequest("brand_id is required".to_owned()))?;

    product_brand::set_product_brand(state.pool(), product_id, brand_id)
        .await
        .map_err(|e| {
            tracing::error!(product_id = %product_id, error = %e, "error creating brand link");
            AppError::BadRequest("Failed to set brand".to_owned())
        })?;

    Ok(Json(SetBrandResponse {
        success: true,
        brand: Some(BrandRef { id: brand_id }),
    }))
}

/// `DELETE /admin/products/{id}/brand` - remove the product's brand.
///
/// Always reports success; a product with no brand link is already in
/// the requested state.
pub async fn remove(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Json<SetBrandResponse> {
    if let Err(e) = product_brand::clear_product_brand(state.pool(), product_id).await {
        tracing::error!(product_id = %product_id, error = %e, "error removing brand link");
    }

    Json(SetBrandResponse {
        success: true,
        brand: None,
    })
}
