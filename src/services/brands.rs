// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::catalog::Brand;
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

pub async fn featured_brands(pool: &PgPool, limit: i64) -> Result<Vec<Brand>, QueryError> {
    sqlx::query_as("SELECT brand_id, name FROM brands ORDER BY name ASC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(db_error)
}
