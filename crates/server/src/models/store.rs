//! Store (vendor tenant) model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agora_core::{StoreId, UserId};

/// A vendor's store.
///
/// `metadata` is free-form JSON; the logo URL lives under the
/// `logo_url` key there rather than in a dedicated column.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(skip)]
    pub owner_user_id: UserId,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// The store's logo URL, if one has been set in metadata.
    #[must_use]
    pub fn logo_url(&self) -> Option<&str> {
        self.metadata.get("logo_url").and_then(|v| v.as_str())
    }
}

/// The public projection of a store used in listings and product joins.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub id: StoreId,
    pub name: String,
    pub metadata: serde_json::Value,
}
