//! Store address model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agora_core::{StoreAddressId, StoreId};

/// A store's physical address. One per store (partial unique index on
/// `store_id` among non-deleted rows).
#[derive(Debug, Clone, Serialize)]
pub struct StoreAddress {
    pub id: StoreAddressId,
    pub store_id: StoreId,
    pub address_1: String,
    pub address_2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub province: Option<String>,
    /// ISO 3166-1 alpha-2 code, stored lowercase (e.g., "gr", "de").
    pub country_code: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
