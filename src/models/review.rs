// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::pagination::{PageMeta, ReviewSort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub sort_by: Option<ReviewSort>,
    pub page_size: Option<i64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRow {
    pub review_id: i32,
    pub rating: i32,
    pub review_title: Option<String>,
    pub review_text: Option<String>,
    pub review_date: DateTime<Utc>,
    pub helpful_votes: i32,
    pub not_helpful_votes: i32,
    pub is_verified_purchase: bool,
    pub user_name: String,
    pub reviewer_location: Option<String>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewImage {
    pub review_image_id: i32,
    pub image_url: String,
    pub alt_text: Option<String>,
}

/// A review with its attached images. Images are loaded only for reviews
/// actually emitted on the page.
#[derive(Debug, Serialize)]
pub struct Review {
    #[serde(flatten)]
    pub review: ReviewRow,
    pub images: Vec<ReviewImage>,
}

#[derive(Debug, Serialize)]
pub struct PagedReviews {
    pub reviews: Vec<Review>,
    pub pagination: PageMeta,
}
