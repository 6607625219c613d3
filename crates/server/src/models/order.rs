//! Order model.
//!
//! Orders are written by checkout (outside this service) and read by the
//! order-placed handler, which denormalizes commission figures into
//! `metadata`. No later recalculation path exists.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use agora_core::{CustomerId, LineItemId, OrderId, ProductId};

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub currency_code: String,
    pub total: Decimal,
    /// Free-form JSON; the commission handler merges in
    /// `platform_commission_rate`, `platform_commission_amount`,
    /// `vendor_payout_estimate` and `payout_status`.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A single order line.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
