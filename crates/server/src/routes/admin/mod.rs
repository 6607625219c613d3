//! Vendor admin routes.
//!
//! Every handler here requires a vendor bearer token; the ones that
//! operate on "the current store" get it from the [`RequireVendor`]
//! extractor.
//!
//! [`RequireVendor`]: crate::middleware::RequireVendor

pub mod brands;
pub mod product_brand;
pub mod products;
pub mod store_address;
pub mod store_logo;
pub mod uploads;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the vendor admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/brands", get(brands::list).post(brands::create))
        .route(
            "/admin/brands/{id}",
            get(brands::get).post(brands::update).delete(brands::delete),
        )
        .route("/admin/products", post(products::create))
        .route(
            "/admin/products/{id}/brand",
            get(product_brand::get)
                .post(product_brand::set)
                .delete(product_brand::remove),
        )
        .route(
            "/admin/store-address",
            get(store_address::get).post(store_address::upsert),
        )
        .route(
            "/admin/store-logo",
            get(store_logo::get).post(store_logo::set),
        )
        .route("/admin/uploads", post(uploads::upload))
}
