// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Session token lookup. Sign-in flows live in the storefront's identity
//! provider; the API only resolves an existing cookie token to its user.

use crate::models::session::SessionUser;
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

/// Resolve a session token to its user. Expired sessions resolve to `None`.
pub async fn validate_session(
    pool: &PgPool,
    token: &str,
) -> Result<Option<SessionUser>, QueryError> {
    sqlx::query_as(
        "SELECT u.id AS id, u.name AS name, u.email AS email, u.role AS role \
         FROM session s \
         INNER JOIN \"user\" u ON s.user_id = u.id \
         WHERE s.token = $1 AND s.expires_at > NOW()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}
