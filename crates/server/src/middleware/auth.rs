//! Authentication extractors for vendor admin routes.
//!
//! Vendor routes operate on "the current store": the store owned by the
//! user a bearer token authenticates. The extractor resolves that store
//! once so handlers receive it directly.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::stores::StoreRepository;
use crate::db::users::UserRepository;
use crate::models::{Store, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// The authenticated vendor: their user record and the store they own.
#[derive(Debug, Clone)]
pub struct CurrentVendor {
    pub user: User,
    pub store: Store,
}

/// Extractor that requires a vendor bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireVendor(vendor): RequireVendor,
/// ) -> impl IntoResponse {
///     format!("store: {}", vendor.store.name)
/// }
/// ```
pub struct RequireVendor(pub CurrentVendor);

/// Rejection for requests without a valid vendor token.
pub enum VendorAuthRejection {
    /// Missing/invalid token or unknown user.
    Unauthorized,
    /// Authenticated user owns no store.
    NoStoreContext,
    /// Lookup failed.
    Internal,
}

impl IntoResponse for VendorAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthorized" })),
            )
                .into_response(),
            Self::NoStoreContext => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "No store context found" })),
            )
                .into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireVendor {
    type Rejection = VendorAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(VendorAuthRejection::Unauthorized)?;

        let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
        let claims = auth
            .validate_token(token)
            .map_err(|_| VendorAuthRejection::Unauthorized)?;

        let user = UserRepository::new(state.pool())
            .get_user(claims.sub)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load user for token");
                VendorAuthRejection::Internal
            })?
            .ok_or(VendorAuthRejection::Unauthorized)?;

        let store = StoreRepository::new(state.pool())
            .get_by_owner(user.id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load store for user");
                VendorAuthRejection::Internal
            })?
            .ok_or(VendorAuthRejection::NoStoreContext)?;

        Ok(Self(CurrentVendor { user, store }))
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
