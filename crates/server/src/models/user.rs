//! Registration saga entities: application users and auth identities.
//!
//! The identity (credentials) and the user (application record) are
//! deliberately separate rows created by separate saga steps, so each
//! step can compensate for exactly what it created.

use chrono::{DateTime, Utc};
use serde::Serialize;

use agora_core::{AuthIdentityId, Email, UserId};

/// An application user (vendor account).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authentication identity (email + password hash).
///
/// `user_id` is set by the bind step once the application user exists.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: AuthIdentityId,
    pub email: Email,
    pub user_id: Option<UserId>,
}
