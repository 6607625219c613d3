//! Order-placed commission recording.
//!
//! Runs once per order-placed event, detached from the request that
//! delivered the event. The handler assumes at-least-once delivery and
//! no ordering between events: a redelivered event recomputes and
//! rewrites the same metadata values, and the links are tolerant of
//! already-existing rows.
//!
//! The whole handler is wrapped in a single catch-and-log: a failure
//! anywhere (including malformed order data) is a silent no-op, not a
//! retry.

use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use agora_core::{CommissionBreakdown, OrderId, PayoutStatus, StoreId};

use crate::db::orders::OrderRepository;
use crate::db::stores::StoreRepository;
use crate::db::RepositoryError;
use crate::models::Order;
use crate::services::stripe::StripeError;
use crate::state::AppState;

/// Errors internal to the commission handler. Never propagated past
/// [`handle_order_placed`]; they exist to make the logging precise.
#[derive(Debug, Error)]
pub enum CommissionError {
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("stripe error: {0}")]
    Stripe(#[from] StripeError),

    #[error("STRIPE_API_KEY not set")]
    StripeNotConfigured,
}

/// Entry point for the order-placed event. Logs and swallows every error.
pub async fn handle_order_placed(state: AppState, order_id: OrderId) {
    if let Err(e) = record_commission(&state, order_id).await {
        tracing::error!(order_id = %order_id, error = %e, "order-placed handler failed");
    }
}

async fn record_commission(state: &AppState, order_id: OrderId) -> Result<(), CommissionError> {
    let orders = OrderRepository::new(state.pool());
    let stores = StoreRepository::new(state.pool());

    let (order, items) = orders
        .get_with_items(order_id)
        .await?
        .ok_or(CommissionError::OrderNotFound(order_id))?;

    // Resolve the owning store through the product↔store relation. The
    // first matching relation row wins; orders mixing products from
    // multiple stores are not split (see DESIGN.md).
    let product_ids: Vec<_> = items.iter().filter_map(|item| item.product_id).collect();
    let Some(store_id) = stores.first_store_for_products(&product_ids).await? else {
        tracing::debug!(order_id = %order_id, "no store relation for order products");
        return Ok(());
    };

    stores.link_order(order.id, store_id).await?;

    // The customer may already be linked from an earlier order; a
    // duplicate link is a no-op, anything else re-raises.
    if let Some(customer_id) = order.customer_id {
        match stores.link_customer(customer_id, store_id).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(order_id = %order_id, "customer already linked to store, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Commission metadata, written unconditionally over any prior values.
    let breakdown = CommissionBreakdown::for_total(order.total);
    let metadata = merged_metadata(&order, &breakdown);
    orders.update_metadata(order.id, &metadata).await?;

    tracing::info!(
        order_id = %order.id,
        total = %order.total,
        commission = %breakdown.commission_amount,
        "commission metadata saved"
    );

    // Best-effort: annotate the upstream PaymentIntent for reconciliation.
    if let Err(e) = annotate_payment(state, &order, store_id).await {
        tracing::error!(order_id = %order.id, error = %e, "failed to update Stripe PaymentIntent metadata");
    }

    Ok(())
}

/// Merge the commission fields into the order's existing metadata.
fn merged_metadata(order: &Order, breakdown: &CommissionBreakdown) -> serde_json::Value {
    let mut metadata = if order.metadata.is_object() {
        order.metadata.clone()
    } else {
        serde_json::json!({})
    };

    if let Some(map) = metadata.as_object_mut() {
        map.insert(
            "platform_commission_rate".to_owned(),
            serde_json::json!(breakdown.rate.to_f64().unwrap_or(0.0)),
        );
        map.insert(
            "platform_commission_amount".to_owned(),
            serde_json::json!(breakdown.commission_amount.to_i64().unwrap_or_default()),
        );
        map.insert(
            "vendor_payout_estimate".to_owned(),
            serde_json::json!(breakdown.payout_estimate.to_i64().unwrap_or_default()),
        );
        map.insert(
            "payout_status".to_owned(),
            serde_json::json!(PayoutStatus::Pending.as_str()),
        );
    }

    metadata
}

async fn annotate_payment(
    state: &AppState,
    order: &Order,
    store_id: StoreId,
) -> Result<(), CommissionError> {
    let stripe = state.stripe().ok_or(CommissionError::StripeNotConfigured)?;
    let stores = StoreRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());

    let store_name = stores
        .get(store_id)
        .await?
        .map_or_else(|| store_id.to_string(), |store| store.name);

    let Some(payment_intent_id) = orders.payment_intent_id(order.id).await? else {
        tracing::warn!(order_id = %order.id, "no Stripe PaymentIntent ID found for order");
        return Ok(());
    };

    stripe
        .annotate_payment_intent(&payment_intent_id, order.id, store_id, &store_name)
        .await?;

    tracing::info!(
        order_id = %order.id,
        payment_intent = %payment_intent_id,
        store = %store_name,
        "Stripe PaymentIntent updated"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order_with_metadata(metadata: serde_json::Value) -> Order {
        Order {
            id: OrderId::generate(),
            customer_id: None,
            currency_code: "eur".to_owned(),
            total: Decimal::from(1000),
            metadata,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merged_metadata_adds_commission_fields() {
        let order = order_with_metadata(serde_json::json!({"gift": true}));
        let breakdown = CommissionBreakdown::for_total(order.total);

        let metadata = merged_metadata(&order, &breakdown);

        assert_eq!(metadata["gift"], serde_json::json!(true));
        assert_eq!(metadata["platform_commission_rate"], serde_json::json!(0.1));
        assert_eq!(metadata["platform_commission_amount"], serde_json::json!(100));
        assert_eq!(metadata["vendor_payout_estimate"], serde_json::json!(900));
        assert_eq!(metadata["payout_status"], serde_json::json!("pending"));
    }

    #[test]
    fn test_merged_metadata_overwrites_prior_values() {
        let order = order_with_metadata(serde_json::json!({
            "platform_commission_amount": 1,
            "payout_status": "paid"
        }));
        let breakdown = CommissionBreakdown::for_total(order.total);

        let metadata = merged_metadata(&order, &breakdown);

        assert_eq!(metadata["platform_commission_amount"], serde_json::json!(100));
        assert_eq!(metadata["payout_status"], serde_json::json!("pending"));
    }

    #[test]
    fn test_merged_metadata_tolerates_non_object() {
        let order = order_with_metadata(serde_json::Value::Null);
        let breakdown = CommissionBreakdown::for_total(order.total);

        let metadata = merged_metadata(&order, &breakdown);

        assert!(metadata.is_object());
        assert_eq!(metadata["payout_status"], serde_json::json!("pending"));
    }
}
