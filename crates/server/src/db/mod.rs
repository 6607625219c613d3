//! Database operations for the marketplace `PostgreSQL`.
//!
//! ## Tables
//!
//! - `store` / `store_address` - Vendor tenants and their single address
//! - `brand` - Labeling taxonomy attachable to products
//! - `auth_identity` / `app_user` - Registration saga entities
//! - `product` / `product_image` - Vendor catalog entries
//! - `orders` / `order_line_item` - Placed orders (commission bookkeeping)
//! - `payment_collection` / `payment_session` - Upstream payment references
//! - `product_store`, `product_brand`, `order_store`, `customer_store` -
//!   association tables ("links")
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p agora-cli -- migrate
//! ```

pub mod brands;
pub mod orders;
pub mod products;
pub mod store_addresses;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use brands::BrandRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use store_addresses::StoreAddressRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate handle or link).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into a `Conflict` with
    /// the given message.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
