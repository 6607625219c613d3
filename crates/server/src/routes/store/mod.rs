//! Public store-surface routes. No authentication.

pub mod brands;
pub mod products;
pub mod store_address;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the public store router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/store/allproducts", get(products::list_all))
        .route("/store/{store_id}/products", get(products::list_for_store))
        .route(
            "/store/get-product-store/{product_id}",
            get(products::product_store),
        )
        .route("/store/brands", get(brands::list))
        .route(
            "/store/store-address/{store_id}",
            get(store_address::get),
        )
}
