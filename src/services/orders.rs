// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Order creation. The order row and its items are written in a single
//! transaction so a failed item insert never leaves a headless order.

use crate::models::order::{CreateOrderRequest, Order};
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

pub async fn create_order(
    pool: &PgPool,
    user_id: &str,
    request: &CreateOrderRequest,
) -> Result<Order, QueryError> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let order: Order = sqlx::query_as(
        "INSERT INTO orders (user_id, total_amount, shipping_address_id, \
             billing_address_id, notes) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, user_id, total_amount::float8 AS total_amount, \
             shipping_address_id, billing_address_id, notes, created_at",
    )
    .bind(user_id)
    .bind(request.total_amount)
    .bind(request.shipping_address_id)
    .bind(
        request
            .billing_address_id
            .unwrap_or(request.shipping_address_id),
    )
    .bind(&request.notes)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    for item in &request.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price_at_purchase) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;
    Ok(order)
}
