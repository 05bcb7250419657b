// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Personalized product recommendations.
//!
//! Picks the three categories the user reviewed in most, then the best rated
//! products from them. Users with no review history fall back to the global
//! top-ranked rail.

use crate::models::catalog::ProductSummary;
use crate::query::QueryError;
use crate::services::{catalog, db_error};
use sqlx::PgPool;

pub async fn personalized(pool: &PgPool, user_id: &str) -> Result<Vec<ProductSummary>, QueryError> {
    let category_ids: Vec<i32> = sqlx::query_scalar(
        "SELECT pc.category_id \
         FROM reviews r \
         INNER JOIN product_categories pc ON r.product_id = pc.product_id \
         WHERE r.user_id = $1 \
         GROUP BY pc.category_id \
         ORDER BY COUNT(*) DESC \
         LIMIT 3",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    if category_ids.is_empty() {
        return catalog::top_ranked_products(pool).await;
    }

    sqlx::query_as(
        "SELECT p.product_id AS product_id, p.name AS name, p.brand_id AS brand_id, \
                b.name AS brand_name, p.overall_rating::float8 AS overall_rating, \
                p.total_reviews AS total_reviews, p.isura_verified AS isura_verified, \
                MIN(pv.price)::float8 AS price, pv.currency AS currency, \
                pi.image_url AS image_url, p.created_at AS created_at \
         FROM product_categories pc \
         INNER JOIN products p ON pc.product_id = p.product_id \
         LEFT JOIN brands b ON p.brand_id = b.brand_id \
         LEFT JOIN product_variants pv ON p.product_id = pv.product_id \
         LEFT JOIN product_images pi \
           ON p.product_id = pi.product_id AND pi.is_thumbnail = TRUE \
         WHERE pc.category_id = ANY($1) \
         GROUP BY p.product_id, b.name, pv.currency, pi.image_url \
         ORDER BY p.overall_rating DESC NULLS LAST, p.total_reviews DESC \
         LIMIT 10",
    )
    .bind(category_ids)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}
