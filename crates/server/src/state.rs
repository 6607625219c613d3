//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::background_removal::BackgroundRemovalClient;
use crate::services::stripe::{StripeClient, StripeError};
use crate::services::uploads::FileStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and external clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    stripe: Option<StripeClient>,
    background_removal: BackgroundRemovalClient,
    files: FileStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Stripe client is only constructed when an API key is
    /// configured; the commission handler treats its absence as a
    /// non-fatal condition per request.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be built from the
    /// configured key.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, StripeError> {
        let stripe = config
            .stripe_api_key
            .as_ref()
            .map(StripeClient::new)
            .transpose()?;
        let background_removal =
            BackgroundRemovalClient::new(config.background_removal_url.clone());
        let files = FileStore::new(config.upload_dir.clone(), &config.backend_url);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
                background_removal,
                files,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the Stripe client, when one is configured.
    #[must_use]
    pub fn stripe(&self) -> Option<&StripeClient> {
        self.inner.stripe.as_ref()
    }

    /// Get a reference to the background-removal client.
    #[must_use]
    pub fn background_removal(&self) -> &BackgroundRemovalClient {
        &self.inner.background_removal
    }

    /// Get a reference to the local file store.
    #[must_use]
    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }
}
