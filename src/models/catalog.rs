// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Product, brand and category rows and responses.

use crate::models::pagination::{PageMeta, ProductSort};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Query parameters for product search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<ProductSort>,
    pub page_size: Option<i64>,
    pub cursor: Option<String>,
}

/// Query parameters for category product listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductsParams {
    pub sort_by: Option<ProductSort>,
    pub page_size: Option<i64>,
    pub cursor: Option<String>,
}

/// One product as it appears in listings (search, category pages, home rails).
/// Joined columns are nullable because brands, variants and thumbnails are
/// attached with LEFT JOINs.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_id: i32,
    pub name: String,
    pub brand_id: i32,
    pub brand_name: Option<String>,
    pub overall_rating: Option<f64>,
    pub total_reviews: i32,
    pub isura_verified: bool,
    /// Lowest variant price, aggregated over all variants.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PagedProducts {
    pub products: Vec<ProductSummary>,
    pub pagination: PageMeta,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailRow {
    pub product_id: i32,
    pub name: String,
    pub brand_id: i32,
    pub brand_name: Option<String>,
    pub overall_rating: Option<f64>,
    pub total_reviews: i32,
    pub total_questions: i32,
    pub detailed_description: Option<String>,
    pub base_description: Option<String>,
    pub suggested_use: Option<String>,
    pub other_ingredients: Option<String>,
    pub warnings: Option<String>,
    pub disclaimer: Option<String>,
    pub isura_verified: bool,
    pub non_gmo_documentation: bool,
    pub mass_spec_lab_tested: bool,
    pub date_first_available: Option<NaiveDate>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub image_id: i32,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_thumbnail: bool,
    pub display_order: i32,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRow {
    pub variant_id: i32,
    pub package_description: String,
    pub price: f64,
    pub currency: String,
    pub list_price: Option<f64>,
    pub serving_size: Option<String>,
    pub servings_per_container: Option<i32>,
    pub is_in_stock: bool,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementFact {
    pub fact_id: i32,
    pub ingredient_name: String,
    pub amount_per_serving: String,
    pub percent_daily_value: Option<String>,
    pub display_order: i32,
}

/// A variant together with its supplement facts table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(flatten)]
    pub variant: VariantRow,
    pub supplement_facts: Vec<SupplementFact>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub category_id: i32,
    pub name: String,
}

/// Full product detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductDetailRow,
    pub images: Vec<ProductImage>,
    pub variants: Vec<Variant>,
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub brand_id: i32,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub category_id: i32,
    pub name: String,
    pub parent_category_id: Option<i32>,
    pub description: Option<String>,
}

/// A category with its children, as returned by the tree endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: CategoryRow,
    pub children: Vec<CategoryNode>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCategory {
    pub category_id: i32,
    pub name: String,
    pub product_count: i64,
}

/// Category listing response: the category itself, its direct subcategories
/// and a cursor-paged product listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProducts {
    pub category: CategoryRow,
    pub subcategories: Vec<CategoryRow>,
    pub products: Vec<ProductSummary>,
    pub pagination: PageMeta,
}

/// Everything the storefront home page needs, fetched concurrently.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub featured_products: Vec<ProductSummary>,
    pub top_ranked_products: Vec<ProductSummary>,
    pub new_arrivals: Vec<ProductSummary>,
    pub featured_brands: Vec<Brand>,
    pub top_categories: Vec<TopCategory>,
}
