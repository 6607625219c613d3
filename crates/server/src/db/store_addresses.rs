//! Database operations for store addresses.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use agora_core::{StoreAddressId, StoreId};

use super::RepositoryError;
use crate::models::StoreAddress;

/// Field values for creating or updating a store address.
///
/// `country_code` is lowercased on write so lookups and display are
/// consistent regardless of what the client sent.
#[derive(Debug, Clone)]
pub struct StoreAddressInput {
    pub address_1: String,
    pub address_2: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub province: Option<String>,
    pub country_code: String,
    pub phone: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct StoreAddressRow {
    id: Uuid,
    store_id: Uuid,
    address_1: String,
    address_2: Option<String>,
    city: String,
    postal_code: String,
    province: Option<String>,
    country_code: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreAddressRow> for StoreAddress {
    fn from(row: StoreAddressRow) -> Self {
        Self {
            id: StoreAddressId::new(row.id),
            store_id: StoreId::new(row.store_id),
            address_1: row.address_1,
            address_2: row.address_2,
            city: row.city,
            postal_code: row.postal_code,
            province: row.province,
            country_code: row.country_code,
            phone: row.phone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ADDRESS_COLUMNS: &str = "id, store_id, address_1, address_2, city, postal_code, province, country_code, phone, created_at, updated_at";

/// Repository for store address operations.
pub struct StoreAddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreAddressRepository<'a> {
    /// Create a new store address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The address of a store, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_store(
        &self,
        store_id: StoreId,
    ) -> Result<Option<StoreAddress>, RepositoryError> {
        let row: Option<StoreAddressRow> = sqlx::query_as(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM store_address
            WHERE store_id = $1 AND deleted_at IS NULL
            "
        ))
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(StoreAddress::from))
    }

    /// Create a store's address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the store already has one
    /// (partial unique index on `store_id`).
    pub async fn create(
        &self,
        store_id: StoreId,
        input: &StoreAddressInput,
    ) -> Result<StoreAddress, RepositoryError> {
        let row: StoreAddressRow = sqlx::query_as(&format!(
            r"
            INSERT INTO store_address
                (id, store_id, address_1, address_2, city, postal_code, province, country_code, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(StoreAddressId::generate())
        .bind(store_id)
        .bind(&input.address_1)
        .bind(&input.address_2)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.province)
        .bind(input.country_code.to_lowercase())
        .bind(&input.phone)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "This store already has an address"))?;

        Ok(row.into())
    }

    /// Update an existing address in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address doesn't exist.
    pub async fn update(
        &self,
        id: StoreAddressId,
        input: &StoreAddressInput,
    ) -> Result<StoreAddress, RepositoryError> {
        let row: Option<StoreAddressRow> = sqlx::query_as(&format!(
            r"
            UPDATE store_address
            SET address_1 = $2, address_2 = $3, city = $4, postal_code = $5,
                province = $6, country_code = $7, phone = $8, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.address_1)
        .bind(&input.address_2)
        .bind(&input.city)
        .bind(&input.postal_code)
        .bind(&input.province)
        .bind(input.country_code.to_lowercase())
        .bind(&input.phone)
        .fetch_optional(self.pool)
        .await?;

        row.map(StoreAddress::from).ok_or(RepositoryError::NotFound)
    }
}
