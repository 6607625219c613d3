//! Event intake endpoints.
//!
//! The checkout pipeline delivers events over HTTP. Handlers acknowledge
//! immediately and do the real work on a detached task, so the caller's
//! request latency never depends on commission bookkeeping — and a
//! redelivered event simply runs the (tolerant) handler again.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;

use agora_core::OrderId;

use crate::services::commission;
use crate::state::AppState;

/// Body of an order-placed event.
#[derive(Debug, Deserialize)]
pub struct OrderPlacedEvent {
    /// The placed order.
    #[serde(alias = "order_id")]
    pub id: OrderId,
}

/// Accept an order-placed event and kick off commission recording.
pub async fn order_placed(
    State(state): State<AppState>,
    Json(event): Json<OrderPlacedEvent>,
) -> (StatusCode, Json<serde_json::Value>) {
    tracing::info!(order_id = %event.id, "order-placed event received");

    tokio::spawn(commission::handle_order_placed(state, event.id));

    (StatusCode::ACCEPTED, Json(json!({ "received": true })))
}
