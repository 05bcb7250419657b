// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Session-scoped routes: the address book, checkout and order creation.

use crate::app::{query_error_response, AppState, CurrentUser};
use crate::models::order::{
    Address, AddressInput, Checkout, CreateCheckoutRequest, CreateOrderRequest, Order,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};

pub async fn list_addresses_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Address>>, (StatusCode, String)> {
    crate::services::addresses::user_addresses(&state.pool, &user.id)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub async fn get_address_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Address>, (StatusCode, String)> {
    crate::services::addresses::address(&state.pool, id, &user.id)
        .await
        .map_err(query_error_response)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Address not found".to_string()))
}

pub async fn create_address_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<AddressInput>,
) -> Result<Json<Address>, (StatusCode, String)> {
    crate::services::addresses::create_address(&state.pool, &user.id, &input)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub async fn update_address_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Address>, (StatusCode, String)> {
    crate::services::addresses::update_address(&state.pool, id, &user.id, &input)
        .await
        .map_err(query_error_response)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Address not found".to_string()))
}

pub async fn delete_address_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    crate::services::addresses::delete_address(&state.pool, id, &user.id)
        .await
        .map_err(query_error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Address not found".to_string()))?;
    Ok(Json(serde_json::json!({})))
}

pub async fn create_checkout_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCheckoutRequest>,
) -> Result<Json<Checkout>, (StatusCode, String)> {
    if request.amount <= 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Amount is required".to_string()));
    }
    crate::services::checkout::create_checkout(&state.pool, &user.id, request.amount)
        .await
        .map(Json)
        .map_err(query_error_response)
}

/// Admin-only: mark a checkout as successful.
pub async fn verify_checkout_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Checkout>, (StatusCode, String)> {
    if !user.is_admin() {
        return Err((StatusCode::FORBIDDEN, "Forbidden".to_string()));
    }
    crate::services::checkout::change_checkout_status(&state.pool, id, "success")
        .await
        .map_err(query_error_response)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Checkout not found".to_string()))
}

pub async fn create_order_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Order>, (StatusCode, String)> {
    crate::services::orders::create_order(&state.pool, &user.id, &request)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub fn account_router() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list_addresses_handler))
        .route("/addresses", post(create_address_handler))
        .route("/addresses/{id}", get(get_address_handler))
        .route("/addresses/{id}", put(update_address_handler))
        .route("/addresses/{id}", delete(delete_address_handler))
        .route("/checkout", post(create_checkout_handler))
        .route("/checkout/{id}/verify", post(verify_checkout_handler))
        .route("/orders", post(create_order_handler))
}
