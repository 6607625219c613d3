//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                             - Health check
//!
//! # Registration & auth
//! POST /stores/regular                     - Vendor self-registration (saga)
//! POST /auth/login                         - Vendor login (mints session token)
//!
//! # Vendor admin (bearer token, "current store" scoped)
//! GET    /admin/brands                     - Brand listing
//! POST   /admin/brands                     - Create brand
//! GET    /admin/brands/{id}                - Brand detail
//! POST   /admin/brands/{id}                - Update brand
//! DELETE /admin/brands/{id}                - Soft-delete brand
//! POST   /admin/products                   - Create product (handle suffixed,
//!                                            linked to the vendor's store)
//! GET    /admin/products/{id}/brand        - Product's brand
//! POST   /admin/products/{id}/brand        - Set product's brand
//! DELETE /admin/products/{id}/brand        - Remove product's brand
//! GET    /admin/store-address              - Current store's address
//! POST   /admin/store-address              - Create/update address
//! GET    /admin/store-logo                 - Logo URL from store metadata
//! POST   /admin/store-logo                 - Set logo URL
//! POST   /admin/uploads                    - Multipart upload (background removal)
//!
//! # Public store surface
//! GET  /store/allproducts                  - Product listing with store join
//! GET  /store/{storeId}/products           - Products of one store
//! GET  /store/get-product-store/{productId}- Owning store of a product
//! GET  /store/brands                       - Brand listing
//! GET  /store/store-address/{storeId}      - A store's address
//! GET  /stores/all                         - Store listing
//!
//! # Events
//! POST /hooks/order-placed                 - Order-placed event intake
//!                                            (fire-and-forget commission)
//! ```

pub mod admin;
pub mod auth;
pub mod hooks;
pub mod store;
pub mod stores;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stores/regular", post(stores::register))
        .route("/stores/all", get(stores::list_all))
        .route("/auth/login", post(auth::login))
        .route("/hooks/order-placed", post(hooks::order_placed))
        .merge(admin::routes())
        .merge(store::routes())
}
