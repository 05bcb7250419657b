// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, session extraction, route handlers, and router
//! construction.
//!
//! This module is `pub` so that integration tests can build a test router
//! directly without starting the full binary.

use crate::models::catalog::{
    CategoryProducts, CategoryProductsParams, HomePage, PagedProducts, SearchParams,
};
use crate::models::config::ConfigEntry;
use crate::models::pagination::PageMeta;
use crate::models::question::{PagedQuestions, QuestionListParams};
use crate::models::review::{PagedReviews, ReviewListParams};
use crate::models::version::VersionResponse;
use crate::query::{clamp_page_size, PgExecutor, QueryError};
use crate::services::catalog::ProductFilters;
use crate::services::{
    brands, catalog, categories, config, questions, recommendations, reviews, session,
};
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tower_cookies::{CookieManagerLayer, Cookies};

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SHOPFRONT_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SHOPFRONT_VERSION");

/// Name of the session cookie issued by the storefront's identity provider.
pub const SESSION_COOKIE: &str = "shopfront_session";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn executor(&self) -> PgExecutor {
        PgExecutor::new(self.pool.clone())
    }
}

// ---------------------------------------------------------------------------
// Session extractor
// ---------------------------------------------------------------------------

/// Axum extractor for the signed-in user. Reads the session cookie and
/// resolves it against the session store; requests without a valid session
/// are rejected with 401 before the handler runs.
pub struct CurrentUser(pub crate::models::session::SessionUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await.map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read request cookies".to_string(),
            )
        })?;

        let token = cookies
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

        let user = session::validate_session(&state.pool, &token)
            .await
            .map_err(query_error_response)?
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired session".to_string(),
                )
            })?;

        Ok(CurrentUser(user))
    }
}

/// Map composer errors onto HTTP responses: bad cursors are the client's
/// fault, everything else is a server-side failure.
pub fn query_error_response(err: QueryError) -> (StatusCode, String) {
    match err {
        QueryError::InvalidCursor(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        QueryError::DataStoreUnavailable(_) => {
            tracing::error!(error = %err, "query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "shopfront-api".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn search_products_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PagedProducts>, (StatusCode, String)> {
    let Some(term) = params.q.as_deref() else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Search query is required".to_string(),
        ));
    };

    let filters = ProductFilters {
        category_id: params.category_id,
        brand_id: params.brand_id,
        min_price: params.min_price,
        max_price: params.max_price,
        min_rating: params.min_rating,
    };
    let sort = params.sort_by.unwrap_or_default();
    let page_size = clamp_page_size(params.page_size);

    let page = catalog::search_products(
        &state.executor(),
        term,
        &filters,
        sort,
        page_size,
        params.cursor.as_deref(),
    )
    .await
    .map_err(query_error_response)?;

    Ok(Json(PagedProducts {
        pagination: PageMeta::of(&page),
        products: page.items,
    }))
}

pub async fn product_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<crate::models::catalog::ProductDetail>, (StatusCode, String)> {
    let detail = catalog::product_detail(&state.pool, id)
        .await
        .map_err(query_error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Product not found".to_string()))?;
    Ok(Json(detail))
}

pub async fn product_reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ReviewListParams>,
) -> Result<Json<PagedReviews>, (StatusCode, String)> {
    let sort = params.sort_by.unwrap_or_default();
    let page_size = clamp_page_size(params.page_size);

    let page = reviews::review_page(
        &state.executor(),
        id,
        sort,
        page_size,
        params.cursor.as_deref(),
    )
    .await
    .map_err(query_error_response)?;

    let pagination = PageMeta::of(&page);
    let reviews = reviews::attach_images(&state.pool, page.items)
        .await
        .map_err(query_error_response)?;

    Ok(Json(PagedReviews {
        reviews,
        pagination,
    }))
}

pub async fn product_questions_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<QuestionListParams>,
) -> Result<Json<PagedQuestions>, (StatusCode, String)> {
    let sort = params.sort_by.unwrap_or_default();
    let page_size = clamp_page_size(params.page_size);

    let page = questions::question_page(
        &state.executor(),
        id,
        sort,
        page_size,
        params.cursor.as_deref(),
    )
    .await
    .map_err(query_error_response)?;

    let pagination = PageMeta::of(&page);
    let questions = questions::attach_answers(&state.pool, page.items)
        .await
        .map_err(query_error_response)?;

    Ok(Json(PagedQuestions {
        questions,
        pagination,
    }))
}

pub async fn category_tree_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::models::catalog::CategoryNode>>, (StatusCode, String)> {
    categories::category_tree(&state.pool)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub async fn category_products_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<CategoryProductsParams>,
) -> Result<Json<CategoryProducts>, (StatusCode, String)> {
    let category = categories::category(&state.pool, id)
        .await
        .map_err(query_error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Category not found".to_string()))?;

    let sort = params.sort_by.unwrap_or_default();
    let page_size = clamp_page_size(params.page_size);

    let page = catalog::category_products(
        &state.executor(),
        id,
        sort,
        page_size,
        params.cursor.as_deref(),
    )
    .await
    .map_err(query_error_response)?;

    let subcategories = categories::subcategories(&state.pool, id)
        .await
        .map_err(query_error_response)?;

    Ok(Json(CategoryProducts {
        category,
        subcategories,
        pagination: PageMeta::of(&page),
        products: page.items,
    }))
}

pub async fn featured_brands_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::models::catalog::Brand>>, (StatusCode, String)> {
    brands::featured_brands(&state.pool, 6)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub async fn compose_home_handler(
    State(state): State<AppState>,
) -> Result<Json<HomePage>, (StatusCode, String)> {
    let (featured, top_ranked, arrivals, featured_brands, top_categories) = tokio::join!(
        catalog::featured_products(&state.pool),
        catalog::top_ranked_products(&state.pool),
        catalog::new_arrivals(&state.pool),
        brands::featured_brands(&state.pool, 6),
        categories::top_categories(&state.pool, 5),
    );

    Ok(Json(HomePage {
        featured_products: featured.map_err(query_error_response)?,
        top_ranked_products: top_ranked.map_err(query_error_response)?,
        new_arrivals: arrivals.map_err(query_error_response)?,
        featured_brands: featured_brands.map_err(query_error_response)?,
        top_categories: top_categories.map_err(query_error_response)?,
    }))
}

pub async fn recommendations_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<crate::models::catalog::ProductSummary>>, (StatusCode, String)> {
    recommendations::personalized(&state.pool, &user.id)
        .await
        .map(Json)
        .map_err(query_error_response)
}

pub async fn config_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ConfigEntry>, (StatusCode, String)> {
    config::configuration(&state.pool, &key)
        .await
        .map_err(query_error_response)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Configuration not found".to_string()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/api/v1/products/search", get(search_products_handler))
        .route("/api/v1/products/details/{id}", get(product_detail_handler))
        .route("/api/v1/products/{id}/reviews", get(product_reviews_handler))
        .route(
            "/api/v1/products/{id}/questions",
            get(product_questions_handler),
        )
        .route("/api/v1/categories", get(category_tree_handler))
        .route(
            "/api/v1/categories/{id}/products",
            get(category_products_handler),
        )
        .route("/api/v1/brands/featured", get(featured_brands_handler))
        .route("/api/v1/compose/home", get(compose_home_handler))
        .route("/api/v1/recommendations", get(recommendations_handler))
        .route("/api/v1/config/{key}", get(config_handler))
        .nest("/api/v1", crate::routes::account_router())
        .with_state(state)
        .layer(CookieManagerLayer::new())
}
