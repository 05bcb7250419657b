// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::order::Checkout;
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

const CHECKOUT_COLUMNS: &str = "checkout_id, user_id, amount::float8 AS amount, status, \
     created_at, updated_at";

pub async fn create_checkout(
    pool: &PgPool,
    user_id: &str,
    amount: f64,
) -> Result<Checkout, QueryError> {
    sqlx::query_as(&format!(
        "INSERT INTO checkouts (user_id, amount) VALUES ($1, $2) RETURNING {CHECKOUT_COLUMNS}"
    ))
    .bind(user_id)
    .bind(amount)
    .fetch_one(pool)
    .await
    .map_err(db_error)
}

/// Move a checkout to a new status. Returns `None` when the id is unknown.
pub async fn change_checkout_status(
    pool: &PgPool,
    checkout_id: i64,
    status: &str,
) -> Result<Option<Checkout>, QueryError> {
    sqlx::query_as(&format!(
        "UPDATE checkouts SET status = $2, updated_at = NOW() \
         WHERE checkout_id = $1 RETURNING {CHECKOUT_COLUMNS}"
    ))
    .bind(checkout_id)
    .bind(status)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}
