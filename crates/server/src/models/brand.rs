//! Brand model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agora_core::BrandId;

/// A labeling taxonomy entity attachable to products, independent of
/// vendor. Linked to products through the `product_brand` table; one
/// brand per product is enforced by the link handlers, not the schema.
#[derive(Debug, Clone, Serialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub handle: String,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}
