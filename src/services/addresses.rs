// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! User address book. Every operation is scoped to the owning user.

use crate::models::order::{Address, AddressInput};
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

const ADDRESS_COLUMNS: &str = "id, user_id, first_name, last_name, phone, street_line1, \
     street_line2, city, state_or_province, postal_code, country";

pub async fn user_addresses(pool: &PgPool, user_id: &str) -> Result<Vec<Address>, QueryError> {
    sqlx::query_as(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

pub async fn address(pool: &PgPool, id: i64, user_id: &str) -> Result<Option<Address>, QueryError> {
    sqlx::query_as(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}

pub async fn create_address(
    pool: &PgPool,
    user_id: &str,
    input: &AddressInput,
) -> Result<Address, QueryError> {
    sqlx::query_as(&format!(
        "INSERT INTO addresses (user_id, first_name, last_name, phone, street_line1, \
             street_line2, city, state_or_province, postal_code, country) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(&input.street_line1)
    .bind(&input.street_line2)
    .bind(&input.city)
    .bind(&input.state_or_province)
    .bind(&input.postal_code)
    .bind(&input.country)
    .fetch_one(pool)
    .await
    .map_err(db_error)
}

pub async fn update_address(
    pool: &PgPool,
    id: i64,
    user_id: &str,
    input: &AddressInput,
) -> Result<Option<Address>, QueryError> {
    sqlx::query_as(&format!(
        "UPDATE addresses SET first_name = $3, last_name = $4, phone = $5, \
             street_line1 = $6, street_line2 = $7, city = $8, state_or_province = $9, \
             postal_code = $10, country = $11, updated_at = NOW() \
         WHERE id = $1 AND user_id = $2 \
         RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(&input.phone)
    .bind(&input.street_line1)
    .bind(&input.street_line2)
    .bind(&input.city)
    .bind(&input.state_or_province)
    .bind(&input.postal_code)
    .bind(&input.country)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}

pub async fn delete_address(
    pool: &PgPool,
    id: i64,
    user_id: &str,
) -> Result<Option<Address>, QueryError> {
    sqlx::query_as(&format!(
        "DELETE FROM addresses WHERE id = $1 AND user_id = $2 RETURNING {ADDRESS_COLUMNS}"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}
