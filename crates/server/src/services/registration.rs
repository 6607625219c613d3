//! Vendor store registration.
//!
//! Contract: given a store name, credentials, and an optional address,
//! produce a store, an authenticated user, and a session token — or fail
//! cleanly with no partial state visible to the caller.
//!
//! Step ordering and failure behavior:
//!
//! 1. Create the auth identity. On failure, abort — nothing to undo yet.
//! 2. Run the store-creation steps under a [`Compensations`] stack:
//!    create the user, bind the identity to it, create the store. On any
//!    failure the completed steps are compensated in reverse order, and
//!    the identity from step 1 is then deleted best-effort (a failure to
//!    delete is logged, not surfaced).
//! 3. After the store commits: persist the address if one was supplied
//!    and passes required-field validation. Failures here are logged,
//!    never propagated — a store can exist without an address.
//! 4. Auto-login with the same credentials to mint the session token.
//!    Failure here does not fail the registration; the token is omitted.
//!
//! The compensations are not atomic with the steps they undo; a crash
//! between a step and its later compensation can leave an orphaned auth
//! identity behind.

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::store_addresses::{StoreAddressInput, StoreAddressRepository};
use crate::db::stores::StoreRepository;
use crate::db::users::UserRepository;
use crate::models::{Store, User};
use crate::services::auth::{AuthError, AuthService};
use crate::services::saga::Compensations;

/// Request payload for vendor self-registration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegistrationInput {
    pub store_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_super_admin: Option<bool>,
    #[serde(default)]
    pub address: Option<AddressPayload>,
}

/// Address fields as supplied by the registration form. Everything is
/// optional at the wire level; required-field validation happens in the
/// post-creation hook, which skips (rather than fails) incomplete input.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AddressPayload {
    pub address_1: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

impl AddressPayload {
    /// Convert into repository input if the required fields are present.
    fn into_input(self) -> Option<StoreAddressInput> {
        let address_1 = self.address_1.filter(|s| !s.is_empty())?;
        let city = self.city.filter(|s| !s.is_empty())?;
        let postal_code = self.postal_code.filter(|s| !s.is_empty())?;
        let country_code = self.country_code.filter(|s| !s.is_empty())?;

        Some(StoreAddressInput {
            address_1,
            address_2: self.address_2.filter(|s| !s.is_empty()),
            city,
            postal_code,
            province: self.province.filter(|s| !s.is_empty()),
            country_code,
            phone: self.phone.filter(|s| !s.is_empty()),
        })
    }
}

/// A successful registration.
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub user: User,
    pub store: Store,
    /// Session token from best-effort auto-login; `None` when auto-login
    /// failed (the registration itself still succeeded).
    pub token: Option<String>,
}

/// Errors surfaced by the registration saga.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Identity(AuthError),

    #[error("Couldn't create the user: {0}")]
    CreateUser(String),

    #[error("Couldn't create the store: {0}")]
    CreateStore(String),
}

/// Run the full registration saga.
///
/// # Errors
///
/// Returns `RegistrationError` when identity, user, or store creation
/// fails; in that case all completed side effects have been compensated
/// (best-effort, see module docs).
pub async fn register_store(
    pool: &PgPool,
    jwt_secret: &SecretString,
    input: RegistrationInput,
) -> Result<RegistrationOutcome, RegistrationError> {
    let auth = AuthService::new(pool, jwt_secret);
    let users = UserRepository::new(pool);
    let stores = StoreRepository::new(pool);

    // Step 1: auth identity. Nothing exists yet, so a failure just aborts.
    let identity = auth
        .register_identity(&input.email, &input.password)
        .await
        .map_err(RegistrationError::Identity)?;

    // Steps 2-3 run under a compensation stack.
    let mut saga = Compensations::new();

    let user = match users
        .create_user(&identity.email, input.is_super_admin.unwrap_or(false))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            cleanup_identity(pool, identity.id).await;
            return Err(RegistrationError::CreateUser(e.to_string()));
        }
    };
    {
        let pool = pool.clone();
        let user_id = user.id;
        saga.record("delete-user", async move {
            UserRepository::new(&pool).delete_user(user_id).await
        });
    }

    if let Err(e) = users.bind_identity(identity.id, user.id).await {
        saga.unwind().await;
        cleanup_identity(pool, identity.id).await;
        return Err(RegistrationError::CreateUser(e.to_string()));
    }

    let store = match stores.create(&input.store_name, user.id).await {
        Ok(store) => store,
        Err(e) => {
            saga.unwind().await;
            cleanup_identity(pool, identity.id).await;
            return Err(RegistrationError::CreateStore(e.to_string()));
        }
    };

    // The store exists; everything from here on is best-effort.
    saga.commit();

    // Post-creation hook: persist the address if one was supplied.
    if let Some(payload) = input.address {
        match payload.into_input() {
            Some(address) => {
                let addresses = StoreAddressRepository::new(pool);
                match addresses.create(store.id, &address).await {
                    Ok(_) => tracing::info!(store_id = %store.id, "store address created"),
                    Err(e) => tracing::error!(
                        store_id = %store.id,
                        error = %e,
                        "failed to create store address"
                    ),
                }
            }
            None => tracing::warn!(
                store_id = %store.id,
                "skipping address creation: missing required fields"
            ),
        }
    }

    // Best-effort auto-login.
    let token = match auth.login(&input.email, &input.password).await {
        Ok((_, token)) => Some(token),
        Err(e) => {
            tracing::warn!(error = %e, "auto-login after registration failed");
            None
        }
    };

    Ok(RegistrationOutcome { user, store, token })
}

/// Delete the identity created in step 1 after a workflow failure.
/// Best-effort: a failure to delete is swallowed, not surfaced.
async fn cleanup_identity(pool: &PgPool, identity_id: agora_core::AuthIdentityId) {
    if let Err(e) = UserRepository::new(pool).delete_identity(identity_id).await {
        tracing::warn!(
            identity_id = %identity_id,
            error = %e,
            "failed to delete auth identity during registration rollback"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_payload_requires_core_fields() {
        let payload = AddressPayload {
            address_1: Some("1 Main St".to_owned()),
            city: Some("Athens".to_owned()),
            postal_code: Some("10431".to_owned()),
            country_code: Some("GR".to_owned()),
            ..Default::default()
        };
        let input = payload.into_input().expect("complete payload");
        assert_eq!(input.address_1, "1 Main St");
        assert!(input.province.is_none());
    }

    #[test]
    fn test_address_payload_missing_field_is_skipped() {
        let payload = AddressPayload {
            address_1: Some("1 Main St".to_owned()),
            city: Some("Athens".to_owned()),
            // no postal code
            country_code: Some("gr".to_owned()),
            ..Default::default()
        };
        assert!(payload.into_input().is_none());
    }

    #[test]
    fn test_address_payload_empty_strings_count_as_missing() {
        let payload = AddressPayload {
            address_1: Some(String::new()),
            city: Some("Athens".to_owned()),
            postal_code: Some("10431".to_owned()),
            country_code: Some("gr".to_owned()),
            ..Default::default()
        };
        assert!(payload.into_input().is_none());
    }
}
