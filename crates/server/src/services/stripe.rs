//! Stripe API client for payment reconciliation.
//!
//! Used by the order-placed handler to annotate the upstream
//! PaymentIntent with order and store identifiers, so monthly vendor
//! payouts can be reconciled from the Stripe dashboard alone.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use agora_core::{OrderId, StoreId};

/// Stripe API base URL.
const BASE_URL: &str = "https://api.stripe.com/v1";

/// Errors that can occur when interacting with the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to construct the client.
    #[error("client error: {0}")]
    Client(String),
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_key: &SecretString) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StripeError::Client(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Write order/store identifiers onto a PaymentIntent's metadata.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` on a non-2xx response.
    pub async fn annotate_payment_intent(
        &self,
        payment_intent_id: &str,
        order_id: OrderId,
        store_id: StoreId,
        store_name: &str,
    ) -> Result<(), StripeError> {
        let url = format!("{BASE_URL}/payment_intents/{payment_intent_id}");

        let params = [
            ("description", format!("Order — {store_name}")),
            ("metadata[order_id]", order_id.to_string()),
            ("metadata[store_id]", store_id.to_string()),
            ("metadata[store_name]", store_name.to_string()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
