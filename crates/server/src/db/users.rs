//! Database operations for auth identities and application users.
//!
//! These are the rows the registration saga creates, binds, and — on
//! failure — deletes again. Deletes are hard deletes: a compensated
//! registration leaves no trace.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{AuthIdentityId, Email, UserId};

use super::RepositoryError;
use crate::models::{AuthIdentity, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    is_super_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            is_super_admin: row.is_super_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    user_id: Option<Uuid>,
}

impl TryFrom<IdentityRow> for AuthIdentity {
    type Error = RepositoryError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AuthIdentityId::new(row.id),
            email,
            user_id: row.user_id.map(UserId::new),
        })
    }
}

/// Repository for user and auth identity operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Auth identities
    // =========================================================================

    /// Create an authentication identity for (email, password hash).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already has an
    /// identity.
    pub async fn create_identity(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AuthIdentity, RepositoryError> {
        let row: IdentityRow = sqlx::query_as(
            r"
            INSERT INTO auth_identity (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, user_id
            ",
        )
        .bind(AuthIdentityId::generate())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "email already registered"))?;

        row.try_into()
    }

    /// Attach an identity to an application user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the identity doesn't exist.
    pub async fn bind_identity(
        &self,
        identity_id: AuthIdentityId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE auth_identity
            SET user_id = $2
            WHERE id = $1
            ",
        )
        .bind(identity_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an identity (compensation path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_identity(&self, id: AuthIdentityId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_identity WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Fetch an identity and its password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_identity_for_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AuthIdentity, String)>, RepositoryError> {
        let row: Option<(Uuid, String, Option<Uuid>, String)> = sqlx::query_as(
            r"
            SELECT id, email, user_id, password_hash
            FROM auth_identity
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some((id, email, user_id, password_hash)) = row else {
            return Ok(None);
        };

        let identity = IdentityRow { id, email, user_id }.try_into()?;
        Ok(Some((identity, password_hash)))
    }

    // =========================================================================
    // Application users
    // =========================================================================

    /// Create an application user record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_user(
        &self,
        email: &Email,
        is_super_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            r"
            INSERT INTO app_user (id, email, is_super_admin)
            VALUES ($1, $2, $3)
            RETURNING id, email, is_super_admin, created_at, updated_at
            ",
        )
        .bind(UserId::generate())
        .bind(email.as_str())
        .bind(is_super_admin)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Delete a user (compensation path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_user(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r"
            SELECT id, email, is_super_admin, created_at, updated_at
            FROM app_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
