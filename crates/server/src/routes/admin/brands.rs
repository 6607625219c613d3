//! Brand CRUD.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agora_core::{BrandId, Handle};

use crate::db::brands::{BrandFilter, BrandPatch, BrandRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::Brand;
use crate::state::AppState;

/// Query parameters for the brand listing.
#[derive(Debug, Default, Deserialize)]
pub struct BrandListParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response envelope for brand listings.
#[derive(Debug, Serialize)]
pub struct BrandListResponse {
    pub brands: Vec<Brand>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// `GET /admin/brands` - list brands ordered by name.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Query(params): Query<BrandListParams>,
) -> Result<Json<BrandListResponse>> {
    let limit = params.limit.unwrap_or(100).clamp(0, 200);
    let offset = params.offset.unwrap_or(0).max(0);

    let filter = BrandFilter {
        q: params.q,
        handle: None,
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

/// Request body for brand creation.
#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
}

/// Single-brand response envelope.
#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub brand: Brand,
}

/// `POST /admin/brands` - create a brand.
///
/// The handle is derived from the name (lowercase, hyphenated) when the
/// client doesn't supply one.
///
/// # Errors
///
/// Returns 400 when the name is missing or the handle is taken.
pub async fn create(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Json(body): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<BrandResponse>)> {
    let name = body
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("Name is required".to_owned()))?;

    let handle = match body.handle.filter(|h| !h.is_empty()) {
        Some(handle) => handle,
        None => Handle::derive(&name)
            .map_err(|_| AppError::BadRequest("Name is required".to_owned()))?
            .into_inner(),
    };

    let brand = BrandRepository::new(state.pool())
        .create(
            &name,
            &handle,
            body.logo_url.as_deref().filter(|s| !s.is_empty()),
            body.description.as_deref().filter(|s| !s.is_empty()),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(BrandResponse { brand })))
}

/// `GET /admin/brands/{id}` - brand detail.
///
/// # Errors
///
/// Returns 404 when the brand doesn't exist.
pub async fn get(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<Json<BrandResponse>> {
    let brand = BrandRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".to_owned()))?;

    Ok(Json(BrandResponse { brand }))
}

/// Request body for a partial brand update.
#[derive(Debug, Deserialize)]
pub struct UpdateBrandRequest {
    pub name: Option<String>,
    pub handle: Option<String>,
    /// `Some(None)` clears the logo; absence leaves it alone.
    #[serde(default, with = "double_option")]
    pub logo_url: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Distinguishes "field absent" from "field present but null".
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

/// `POST /admin/brands/{id}` - update a brand.
///
/// # Errors
///
/// Returns 404 when the brand doesn't exist, 400 on a handle collision.
pub async fn update(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
    Json(body): Json<UpdateBrandRequest>,
) -> Result<Json<BrandResponse>> {
    let patch = BrandPatch {
        name: body.name,
        handle: body.handle,
        logo_url: body.logo_url,
        description: body.description,
    };

    let brand = BrandRepository::new(state.pool())
        .update(id, patch)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Brand not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(BrandResponse { brand }))
}

/// Response for a brand deletion.
#[derive(Debug, Serialize)]
pub struct DeleteBrandResponse {
    pub id: BrandId,
    pub deleted: bool,
}

/// `DELETE /admin/brands/{id}` - soft-delete a brand.
///
/// # Errors
///
/// Returns 404 when the brand doesn't exist.
pub async fn delete(
    RequireVendor(_vendor): RequireVendor,
    State(state): State<AppState>,
    Path(id): Path<BrandId>,
) -> Result<Json<DeleteBrandResponse>> {
    BrandRepository::new(state.pool())
        .soft_delete(id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Brand not found".to_owned())
            }
            other => other.into(),
        })?;

    Ok(Json(DeleteBrandResponse { id, deleted: true }))
}
