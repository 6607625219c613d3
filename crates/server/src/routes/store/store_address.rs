//! Public store-address read.

use axum::{
    Json,
    extract::{Path, State},
};

use agora_core::StoreId;

use crate::db::store_addresses::StoreAddressRepository;
use crate::error::Result;
use crate::routes::admin::store_address::StoreAddressResponse;
use crate::state::AppState;

/// `GET /store/store-address/{storeId}` - a store's address, or null.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn get(
    State(state): State<AppState>,
    Path(store_id): Path<StoreId>,
) -> Result<Json<StoreAddressResponse>> {
    let store_address = StoreAddressRepository::new(state.pool())
        .get_by_store(store_id)
        .await?;

    Ok(Json(StoreAddressResponse { store_address }))
}
