//! Vendor registration and the public store listing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use agora_core::StoreId;

use crate::db::stores::StoreRepository;
use crate::error::{AppError, Result};
use crate::models::{StoreSummary, User};
use crate::services::registration::{self, RegistrationInput};
use crate::state::AppState;

/// Request body for `POST /stores/regular`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub input: RegistrationInput,
    /// Must match `STORE_REGISTRATION_CODE` when one is configured.
    pub registration_code: Option<String>,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Register a vendor store.
///
/// Validates the registration code (when configured) before any side
/// effect, then runs the registration saga.
///
/// # Errors
///
/// Returns 401 for a bad code, 422 for any saga failure.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    if let Some(expected) = state.config().registration_code.as_deref() {
        let provided = body.registration_code.as_deref();
        if provided != Some(expected) {
            return Err(AppError::Unauthorized(
                "Μη έγκυρος κωδικός εγγραφής.".to_owned(),
            ));
        }
    }

    let outcome = registration::register_store(
        state.pool(),
        &state.config().jwt_secret,
        body.input,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "/stores/regular error");
        AppError::Unprocessable(e.to_string())
    })?;

    Ok(Json(RegisterResponse {
        message: "Ok",
        user: outcome.user,
        token: outcome.token,
    }))
}

/// Query parameters for `GET /stores/all`.
#[derive(Debug, Default, Deserialize)]
pub struct StoreListParams {
    pub q: Option<String>,
    /// Comma-separated store ids.
    pub ids: Option<String>,
    /// Single id, kept for older clients.
    pub id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response envelope for the store listing.
#[derive(Debug, Serialize)]
pub struct StoreListResponse {
    pub stores: Vec<StoreSummary>,
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Public store listing, newest first.
///
/// # Errors
///
/// Returns 500 on database failure.
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<StoreListParams>,
) -> Result<Json<StoreListResponse>> {
    let limit = params.limit.unwrap_or(12).clamp(0, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let ids = parse_id_list(params.ids.as_deref().or(params.id.as_deref()));

    let (stores, count) = StoreRepository::new(state.pool())
        .list(params.q.as_deref(), ids.as_deref(), limit, offset)
        .await?;

    Ok(Json(StoreListResponse {
        stores,
        count,
        limit,
        offset,
    }))
}

/// Split a comma-separated id parameter, dropping anything unparsable.
fn parse_id_list(raw: Option<&str>) -> Option<Vec<StoreId>> {
    let raw = raw?;
    let ids: Vec<StoreId> = raw
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    (!ids.is_empty()).then_some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list_splits_and_skips_garbage() {
        let a = StoreId::generate();
        let b = StoreId::generate();
        let raw = format!("{a}, {b},not-a-uuid");

        let ids = parse_id_list(Some(&raw)).expect("some ids");
        assert_eq!(ids, vec![a, b]);

        assert!(parse_id_list(Some("junk")).is_none());
        assert!(parse_id_list(None).is_none());
    }
}
