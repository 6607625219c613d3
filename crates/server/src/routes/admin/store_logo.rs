//! Current store's logo.
//!
//! The logo URL lives under the `logo_url` key of the store's metadata
//! document rather than in its own column.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::stores::StoreRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::state::AppState;

/// Response for the logo read.
#[derive(Debug, Serialize)]
pub struct LogoResponse {
    pub logo_url: Option<String>,
}

/// `GET /admin/store-logo` - the current logo URL, or null.
pub async fn get(RequireVendor(vendor): RequireVendor) -> Json<LogoResponse> {
    Json(LogoResponse {
        logo_url: vendor.store.logo_url().map(ToOwned::to_owned),
    })
}

/// Request body for setting the logo.
#[derive(Debug, Deserialize)]
pub struct SetLogoRequest {
    pub logo_url: Option<String>,
}

/// Response for the logo write.
#[derive(Debug, Serialize)]
pub struct SetLogoResponse {
    pub success: bool,
    pub logo_url: String,
}

/// `POST /admin/store-logo` - merge `logo_url` into the store metadata.
///
/// # Errors
///
/// Returns 400 when `logo_url` is missing.
pub async fn set(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Json(body): Json<SetLogoRequest>,
) -> Result<Json<SetLogoResponse>> {
    let logo_url = body
        .logo_url
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("logo_url is required".to_owned()))?;

    let mut metadata = if vendor.store.metadata.is_object() {
        vendor.store.metadata.clone()
    } else {
        serde_json::json!({})
    };
    if let Some(map) = metadata.as_object_mut() {
        map.insert("logo_url".to_owned(), serde_json::json!(logo_url));
    }

    StoreRepository::new(state.pool())
        .update_metadata(vendor.store.id, &metadata)
        .await?;

    Ok(Json(SetLogoResponse {
        success: true,
        logo_url,
    }))
}
