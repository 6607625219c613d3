//! Public brand listing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::brands::{BrandFilter, BrandRepository};
use crate::error::Result;
use crate::routes::admin::brands::BrandListResponse;
use crate::state::AppState;

/// Query parameters for the public brand listing.
#[derive(Debug, Default, Deserialize)]
pub struct PublicBrandParams {
    pub handle: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /store/brands` - brands ordered by name, optional handle filter.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PublicBrandParams>,
) -> Result<Json<BrandListResponse>> {
    let limit = params.limit.unwrap_or(100).clamp(0, 200);
    let offset = params.offset.unwrap_or(0).max(0);

    let filter = BrandFilter {
        q: None,
        handle: params.handle,
    };

    let (brands, count) = BrandRepository::new(state.pool())
        .list(&filter, limit, offset)
        .await?;

    Ok(Json(BrandListResponse {
        brands,
        count,
        limit,
        offset,
    }))
}
