//! Current store's address.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::store_addresses::{StoreAddressInput, StoreAddressRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::models::StoreAddress;
use crate::state::AppState;

/// Response envelope for address reads and writes.
#[derive(Debug, Serialize)]
pub struct StoreAddressResponse {
    pub store_address: Option<StoreAddress>,
}

/// `GET /admin/store-address` - the current store's address, or null.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn get(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
) -> Result<Json<StoreAddressResponse>> {
    let store_address = StoreAddressRepository::new(state.pool())
        .get_by_store(vendor.store.id)
        .await?;

    Ok(Json(StoreAddressResponse { store_address }))
}

/// Request body for creating/updating the address.
#[derive(Debug, Deserialize)]
pub struct UpsertAddressRequest {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

/// `POST /admin/store-address` - create (201) or update (200) the
/// current store's address.
///
/// # Errors
///
/// Returns 400 when any of the required fields is missing.
pub async fn upsert(
    RequireVendor(vendor): RequireVendor,
    State(state): State<AppState>,
    Json(body): Json<UpsertAddressRequest>,
) -> Result<(StatusCode, Json<StoreAddressResponse>)> {
    let (address_1, city, postal_code, country_code) = match (
        body.address_1.filter(|s| !s.is_empty()),
        body.city.filter(|s| !s.is_empty()),
        body.postal_code.filter(|s| !s.is_empty()),
        body.country_code.filter(|s| !s.is_empty()),
    ) {
        (Some(a), Some(c), Some(p), Some(cc)) => (a, c, p, cc),
        _ => {
            return Err(AppError::BadRequest(
                "address_1, city, postal_code, and country_code are required".to_owned(),
            ));
        }
    };

    let input = StoreAddressInput {
        address_1,
        address_2: body.address_2.filter(|s| !s.is_empty()),
        city,
        postal_code,
        province: body.province.filter(|s| !s.is_empty()),
        country_code,
        phone: body.phone.filter(|s| !s.is_empty()),
    };

    let addresses = StoreAddressRepository::new(state.pool());

    let (status, store_address) = match addresses.get_by_store(vendor.store.id).await? {
        Some(existing) => (
            StatusCode::OK,
            addresses.update(existing.id, &input).await?,
        ),
        None => (
            StatusCode::CREATED,
            addresses.create(vendor.store.id, &input).await?,
        ),
    };

    Ok((
        status,
        Json(StoreAddressResponse {
            store_address: Some(store_address),
        }),
    ))
}
