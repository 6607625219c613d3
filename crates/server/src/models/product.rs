//! Product model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agora_core::ProductId;

use super::store::StoreSummary;

/// A vendor catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// URL slug; always carries a random suffix so vendors can reuse
    /// titles (uniqueness is probabilistic, not constrained).
    pub handle: String,
    pub thumbnail: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A product together with its owning store and image URLs, as served by
/// the public listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStore {
    #[serde(flatten)]
    pub product: Product,
    pub store: Option<StoreSummary>,
    pub images: Vec<ProductImage>,
}

/// An image attached to a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub url: String,
    pub rank: i32,
}
