//! Authentication service.
//!
//! Owns password hashing for auth identities and the HS256 session
//! tokens handed out by login/auto-login. Intentionally permissive about
//! password content: the only hard rule is non-emptiness, with the
//! identity store's unique email constraint arbitrating duplicates.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use agora_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::AuthIdentity;

/// Session token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user id.
    pub sub: UserId,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service.
///
/// Handles identity registration, login, and session token issuance.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt_secret: &'a SecretString,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, jwt_secret: &'a SecretString) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt_secret,
        }
    }

    // =========================================================================
    // Identities
    // =========================================================================

    /// Create an authentication identity for (email, password).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email,
    /// `AuthError::WeakPassword` for an empty password, and
    /// `AuthError::EmailTaken` if the email already has an identity.
    pub async fn register_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, AuthError> {
        let email = Email::parse(email)?;

        if password.is_empty() {
            return Err(AuthError::WeakPassword("password cannot be empty".to_owned()));
        }

        let password_hash = hash_password(password)?;

        let identity = self
            .users
            .create_identity(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(identity)
    }

    /// Authenticate with email and password, returning the identity and a
    /// freshly minted session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email has no
    /// identity, the password is wrong, or no user is bound yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<(AuthIdentity, String), AuthError> {
        let email = Email::parse(email)?;

        let (identity, password_hash) = self
            .users
            .get_identity_for_login(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let user_id = identity.user_id.ok_or(AuthError::InvalidCredentials)?;
        let token = self.mint_token(user_id)?;

        Ok((identity, token))
    }

    // =========================================================================
    // Session tokens
    // =========================================================================

    /// Mint a session token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn mint_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.expose_secret().as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed, mis-signed, or
    /// expired tokens.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

// =============================================================================
// Password hashing
// =============================================================================

/// Hash a password with argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(verify_password("hunter2", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").expect("hash");
        let b = hash_password("same").expect("hash");
        assert_ne!(a, b);
    }
}
