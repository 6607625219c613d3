//! Vendor login.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Authenticate a vendor and mint a session token.
///
/// # Errors
///
/// Returns 401 for bad credentials.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool(), &state.config().jwt_secret);
    let (identity, token) = auth.login(&body.email, &body.password).await?;

    let user_id = identity
        .user_id
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_owned()))?;

    let user = UserRepository::new(state.pool())
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_owned()))?;

    Ok(Json(LoginResponse { user, token }))
}
