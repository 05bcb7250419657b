// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::config::ConfigEntry;
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

pub async fn configuration(pool: &PgPool, key: &str) -> Result<Option<ConfigEntry>, QueryError> {
    sqlx::query_as(
        "SELECT key, value FROM config WHERE key = $1 AND deleted_at IS NULL LIMIT 1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}
