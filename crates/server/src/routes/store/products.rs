//! Public product listings.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use agora_core::{BrandId, ProductId, StoreId};

use crate::db::products::{ProductFilter, ProductRepository};
use crate::db::stores::StoreRepository;
use crate::error::Result;
use crate::models::{ProductWithStore, StoreSummary};
use crate::state::AppState;

/// Query parameters accepted by the product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub q: Option<String>,
    /// Comma-separated product ids.
    pub id: Option<String>,
    pub collection_id: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<BrandId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response envelope for product listings.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductWithStore>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ProductListParams {
    fn into_filter(self, store_id: Option<StoreId>) -> (ProductFilter, i64, i64) {
        let limit = self.limit.unwrap_or(12).clamp(0, 100);
        let offset = self.offset.unwrap_or(0).max(0);

        let ids = self.id.as_deref().map(|raw| {
            raw.split(',')
                .filter_map(|s| s.trim().parse::<ProductId>().ok())
                .collect::<Vec<_>>()
        });

        let filter = ProductFilter {
            q: self.q,
            ids: ids.filter(|v| !v.is_empty()),
            collection_id: self.collection_id,
            category_id: self.category_id,
            brand_id: self.brand_id,
            store_id,
        };

        (filter, limit, offset)
    }
}

/// `GET /store/allproducts` - all products, newest first, with their
/// owning store and images.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>> {
    let (filter, limit, offset) = params.into_filter(None);

    let (products, count) = ProductRepository::new(state.pool())
        .list(&filter, limit, offset)
        .await?;

    Ok(Json(ProductListResponse {
        products,
        count,
        limit,
        offset,
    }))
}

/// `GET /store/{storeId}/products` - one store's products.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list_for_store(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
    Query(params): Query<ProductListParams>,
) -> Result<Json<ProductListResponse>> {
    let (filter, limit, offset) = params.into_filter(Some(store_id));

    let (products, count) = ProductRepository::new(state.pool())
        .list(&filter, limit, offset)
        .await?;

    Ok(Json(ProductListResponse {
        products,
        count,
        limit,
        offset,
    }))
}

/// Response carrying a product's owning store (or null).
#[derive(Debug, Serialize)]
pub struct ProductStoreResponse {
    pub store: Option<StoreSummary>,
}

/// `GET /store/get-product-store/{productId}` - the store that owns a
/// product. Unknown products resolve to `{"store": null}`.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn product_store(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductStoreResponse>> {
    let store = StoreRepository::new(state.pool())
        .store_of_product(product_id)
        .await?;

    Ok(Json(ProductStoreResponse { store }))
}
