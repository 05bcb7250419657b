// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Product catalog: search, category listings, home-page rails and detail.
//!
//! Listing queries aggregate the lowest variant price per product, so the
//! result set is grouped by product and price-range filters must run after
//! aggregation. The filter builder below keeps that split explicit.

use crate::models::catalog::{
    CategoryRef, ProductDetail, ProductDetailRow, ProductImage, ProductSummary, SupplementFact,
    Variant, VariantRow,
};
use crate::models::pagination::ProductSort;
use crate::query::{
    apply_cursor, fetch_page, CursorValue, OrderSpec, Page, PageQuery, Predicate, QueryError,
    QueryExecutor, SortDir, SqlValue,
};
use crate::services::db_error;
use sqlx::PgPool;

const PRODUCT_PROJECTION: &str = "p.product_id AS product_id, p.name AS name, \
     p.brand_id AS brand_id, b.name AS brand_name, \
     p.overall_rating::float8 AS overall_rating, p.total_reviews AS total_reviews, \
     p.isura_verified AS isura_verified, MIN(pv.price)::float8 AS price, \
     pv.currency AS currency, pi.image_url AS image_url, p.created_at AS created_at";

const PRODUCT_FROM: &str = "products p \
     LEFT JOIN brands b ON p.brand_id = b.brand_id \
     LEFT JOIN product_variants pv ON p.product_id = pv.product_id \
     LEFT JOIN product_images pi ON p.product_id = pi.product_id AND pi.is_thumbnail = TRUE";

/// Assumes one currency and at most one thumbnail row per product. A product
/// violating that emits one output row per combination, and the product id
/// stops being a unique tiebreak across rows.
const PRODUCT_GROUP_BY: &str = "p.product_id, b.name, pv.currency, pi.image_url";

/// Price sort key. A product with no variants aggregates to NULL, which
/// PostgreSQL orders apart from every value and which no cursor bound can
/// match; coalescing to 0 keeps the order total and the cursor resumable.
const PRICE_SORT_EXPR: &str = "COALESCE(MIN(pv.price), 0)";

/// Free-text search matches the product name, brand name and description.
const SEARCH_COLUMNS: &[&str] = &["p.name", "b.name", "p.base_description"];

/// Facet filters accepted by product listings.
#[derive(Debug, Default, Clone)]
pub struct ProductFilters {
    pub category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
}

fn product_order(sort: ProductSort) -> OrderSpec {
    let (expr, dir, aggregate) = match sort {
        ProductSort::Popularity => ("p.total_reviews", SortDir::Desc, false),
        ProductSort::PriceAsc => (PRICE_SORT_EXPR, SortDir::Asc, true),
        ProductSort::PriceDesc => (PRICE_SORT_EXPR, SortDir::Desc, true),
        ProductSort::Newest => ("p.created_at", SortDir::Desc, false),
    };
    OrderSpec {
        expr,
        dir,
        aggregate,
        tiebreak: "p.product_id",
    }
}

fn product_cursor_value(sort: ProductSort, row: &ProductSummary) -> CursorValue {
    match sort {
        ProductSort::Popularity => CursorValue::Int(i64::from(row.total_reviews)),
        ProductSort::PriceAsc | ProductSort::PriceDesc => {
            // Must agree with PRICE_SORT_EXPR: a variant-less product sorts
            // as 0, so its cursor carries 0.
            CursorValue::Float(row.price.unwrap_or(0.0))
        }
        ProductSort::Newest => CursorValue::Timestamp(row.created_at.timestamp_micros()),
    }
}

/// Assemble the listing query: text match and facet filters before grouping,
/// price-range filters after (they constrain the aggregated minimum price).
fn build_product_query(
    term: Option<&str>,
    filters: &ProductFilters,
    sort: ProductSort,
    page_size: i64,
) -> PageQuery {
    let mut from = PRODUCT_FROM.to_string();
    let mut predicates = Vec::new();
    let mut having = Vec::new();

    if let Some(term) = term {
        predicates.push(Predicate::TextMatch {
            columns: SEARCH_COLUMNS,
            pattern: format!("%{}%", term.trim()),
        });
    }
    if let Some(category_id) = filters.category_id {
        from.push_str(" INNER JOIN product_categories pc ON p.product_id = pc.product_id");
        predicates.push(Predicate::Eq {
            column: "pc.category_id",
            value: SqlValue::Int(category_id),
        });
    }
    if let Some(brand_id) = filters.brand_id {
        predicates.push(Predicate::Eq {
            column: "p.brand_id",
            value: SqlValue::Int(brand_id),
        });
    }
    if let Some(min_rating) = filters.min_rating {
        predicates.push(Predicate::GtEq {
            column: "p.overall_rating",
            value: SqlValue::Float(min_rating),
        });
    }
    if let Some(min_price) = filters.min_price {
        having.push(Predicate::GtEq {
            column: "MIN(pv.price)",
            value: SqlValue::Float(min_price),
        });
    }
    if let Some(max_price) = filters.max_price {
        having.push(Predicate::LtEq {
            column: "MIN(pv.price)",
            value: SqlValue::Float(max_price),
        });
    }

    PageQuery {
        projection: PRODUCT_PROJECTION,
        from,
        filters: predicates,
        having,
        group_by: Some(PRODUCT_GROUP_BY),
        order: product_order(sort),
        bound: None,
        limit: page_size,
    }
}

/// Free-text product search. A blank term short-circuits to an empty page
/// without touching the database.
pub async fn search_products<E>(
    executor: &E,
    term: &str,
    filters: &ProductFilters,
    sort: ProductSort,
    page_size: i64,
    cursor: Option<&str>,
) -> Result<Page<ProductSummary>, QueryError>
where
    E: QueryExecutor<ProductSummary> + ?Sized,
{
    if term.trim().is_empty() {
        return Ok(Page::empty());
    }

    let mut query = build_product_query(Some(term), filters, sort, page_size);
    apply_cursor(&mut query, cursor, sort.tag())?;
    fetch_page(executor, query, sort.tag(), |row| {
        (i64::from(row.product_id), product_cursor_value(sort, row))
    })
    .await
}

/// Cursor-paged product listing for one category.
pub async fn category_products<E>(
    executor: &E,
    category_id: i64,
    sort: ProductSort,
    page_size: i64,
    cursor: Option<&str>,
) -> Result<Page<ProductSummary>, QueryError>
where
    E: QueryExecutor<ProductSummary> + ?Sized,
{
    let filters = ProductFilters {
        category_id: Some(category_id),
        ..ProductFilters::default()
    };
    let mut query = build_product_query(None, &filters, sort, page_size);
    apply_cursor(&mut query, cursor, sort.tag())?;
    fetch_page(executor, query, sort.tag(), |row| {
        (i64::from(row.product_id), product_cursor_value(sort, row))
    })
    .await
}

async fn product_rail(pool: &PgPool, where_clause: &str, order_by: &str) -> Result<Vec<ProductSummary>, QueryError> {
    let sql = format!(
        "SELECT {PRODUCT_PROJECTION} FROM {PRODUCT_FROM} {where_clause} \
         GROUP BY {PRODUCT_GROUP_BY} ORDER BY {order_by} LIMIT 10"
    );
    sqlx::query_as(&sql).fetch_all(pool).await.map_err(db_error)
}

pub async fn featured_products(pool: &PgPool) -> Result<Vec<ProductSummary>, QueryError> {
    product_rail(pool, "WHERE p.is_featured = TRUE", "p.total_reviews DESC").await
}

pub async fn top_ranked_products(pool: &PgPool) -> Result<Vec<ProductSummary>, QueryError> {
    product_rail(pool, "", "p.overall_rating DESC NULLS LAST").await
}

pub async fn new_arrivals(pool: &PgPool) -> Result<Vec<ProductSummary>, QueryError> {
    product_rail(pool, "", "p.created_at DESC").await
}

/// Product detail page: the product row plus images, variants with their
/// supplement facts, and category memberships.
pub async fn product_detail(pool: &PgPool, product_id: i64) -> Result<Option<ProductDetail>, QueryError> {
    let product: Option<ProductDetailRow> = sqlx::query_as(
        "SELECT p.product_id AS product_id, p.name AS name, p.brand_id AS brand_id, \
                b.name AS brand_name, p.overall_rating::float8 AS overall_rating, \
                p.total_reviews AS total_reviews, p.total_questions AS total_questions, \
                p.detailed_description AS detailed_description, \
                p.base_description AS base_description, p.suggested_use AS suggested_use, \
                p.other_ingredients AS other_ingredients, p.warnings AS warnings, \
                p.disclaimer AS disclaimer, p.isura_verified AS isura_verified, \
                p.non_gmo_documentation AS non_gmo_documentation, \
                p.mass_spec_lab_tested AS mass_spec_lab_tested, \
                p.date_first_available AS date_first_available \
         FROM products p LEFT JOIN brands b ON p.brand_id = b.brand_id \
         WHERE p.product_id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)?;

    let Some(product) = product else {
        return Ok(None);
    };

    let images: Vec<ProductImage> = sqlx::query_as(
        "SELECT image_id, image_url, alt_text, is_thumbnail, display_order \
         FROM product_images WHERE product_id = $1 ORDER BY display_order ASC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let variant_rows: Vec<VariantRow> = sqlx::query_as(
        "SELECT variant_id, package_description, price::float8 AS price, currency, \
                list_price::float8 AS list_price, serving_size, servings_per_container, \
                is_in_stock \
         FROM product_variants WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    let mut variants = Vec::with_capacity(variant_rows.len());
    for variant in variant_rows {
        let supplement_facts: Vec<SupplementFact> = sqlx::query_as(
            "SELECT fact_id, ingredient_name, amount_per_serving, percent_daily_value, \
                    display_order \
             FROM supplement_facts WHERE variant_id = $1 ORDER BY display_order ASC",
        )
        .bind(variant.variant_id)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;
        variants.push(Variant {
            variant,
            supplement_facts,
        });
    }

    let categories: Vec<CategoryRef> = sqlx::query_as(
        "SELECT c.category_id AS category_id, c.name AS name \
         FROM product_categories pc \
         INNER JOIN categories c ON pc.category_id = c.category_id \
         WHERE pc.product_id = $1",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(Some(ProductDetail {
        product,
        images,
        variants,
        categories,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_shape() {
        let filters = ProductFilters {
            brand_id: Some(3),
            min_rating: Some(4.0),
            ..ProductFilters::default()
        };
        let query = build_product_query(Some("zinc"), &filters, ProductSort::Popularity, 20);
        let rendered = query.render();
        assert!(rendered.sql.contains(
            "(p.name ILIKE $1 OR b.name ILIKE $1 OR p.base_description ILIKE $1)"
        ));
        assert!(rendered.sql.contains("p.brand_id = $2"));
        assert!(rendered.sql.contains("p.overall_rating >= $3"));
        assert!(rendered.sql.contains("GROUP BY p.product_id, b.name, pv.currency, pi.image_url"));
        assert!(rendered.sql.contains("ORDER BY p.total_reviews DESC, p.product_id DESC"));
        assert!(!rendered.sql.contains("product_categories"));
        assert_eq!(rendered.binds[0], SqlValue::Text("%zinc%".to_string()));
    }

    #[test]
    fn test_category_filter_adds_join() {
        let filters = ProductFilters {
            category_id: Some(7),
            ..ProductFilters::default()
        };
        let query = build_product_query(None, &filters, ProductSort::Popularity, 20);
        assert!(query
            .from
            .contains("INNER JOIN product_categories pc ON p.product_id = pc.product_id"));
        let rendered = query.render();
        assert!(rendered.sql.contains("pc.category_id = $1"));
    }

    #[test]
    fn test_price_range_is_post_aggregation() {
        let filters = ProductFilters {
            min_price: Some(40.0),
            max_price: Some(80.0),
            ..ProductFilters::default()
        };
        let query = build_product_query(Some("magnesium"), &filters, ProductSort::PriceAsc, 20);
        let rendered = query.render();
        let (before_having, after_having) = rendered.sql.split_once(" HAVING ").unwrap();
        assert!(!before_having.contains("MIN(pv.price) >="));
        assert!(after_having.contains("MIN(pv.price) >= $2"));
        assert!(after_having.contains("MIN(pv.price) <= $3"));
        assert!(
            after_having.contains("ORDER BY COALESCE(MIN(pv.price), 0) ASC, p.product_id DESC")
        );
    }

    #[test]
    fn test_price_sort_places_cursor_bound_in_having() {
        let mut query =
            build_product_query(Some("zinc"), &ProductFilters::default(), ProductSort::PriceAsc, 20);
        let token = crate::query::Cursor::new("price_asc", 42, CursorValue::Float(12.5)).encode();
        apply_cursor(&mut query, Some(&token), "price_asc").unwrap();
        let rendered = query.render();
        let (before_having, after_having) = rendered.sql.split_once(" HAVING ").unwrap();
        assert!(!before_having.contains("COALESCE"));
        assert!(after_having.contains(
            "(COALESCE(MIN(pv.price), 0) > $2 OR \
             (COALESCE(MIN(pv.price), 0) = $2 AND p.product_id < $3))"
        ));
    }

    fn summary(product_id: i32, price: Option<f64>) -> ProductSummary {
        ProductSummary {
            product_id,
            name: format!("product {product_id}"),
            brand_id: 1,
            brand_name: None,
            overall_rating: None,
            total_reviews: 0,
            isura_verified: false,
            price,
            currency: None,
            image_url: None,
            created_at: chrono::Utc::now(),
        }
    }

    /// Evaluates the price order, bound and limit the way PostgreSQL would:
    /// a plain aggregate key is NULL for variant-less products (ordered apart
    /// from every value, never matched by a comparison), while a coalesced
    /// key treats them as 0.
    struct MemCatalog {
        rows: Vec<ProductSummary>,
    }

    impl MemCatalog {
        fn sort_key(query: &PageQuery, row: &ProductSummary) -> Option<f64> {
            if query.order.expr.starts_with("COALESCE") {
                Some(row.price.unwrap_or(0.0))
            } else {
                row.price
            }
        }
    }

    #[async_trait::async_trait]
    impl QueryExecutor<ProductSummary> for MemCatalog {
        async fn fetch_rows(&self, query: &PageQuery) -> Result<Vec<ProductSummary>, QueryError> {
            use std::cmp::Ordering;

            let dir = query.order.dir;
            let mut rows = self.rows.clone();
            rows.sort_by(|a, b| {
                let primary = match (Self::sort_key(query, a), Self::sort_key(query, b)) {
                    (Some(x), Some(y)) => {
                        let by_value = x.partial_cmp(&y).expect("finite price");
                        match dir {
                            SortDir::Asc => by_value,
                            SortDir::Desc => by_value.reverse(),
                        }
                    }
                    (None, None) => Ordering::Equal,
                    // NULLS LAST ascending, NULLS FIRST descending.
                    (None, Some(_)) => match dir {
                        SortDir::Asc => Ordering::Greater,
                        SortDir::Desc => Ordering::Less,
                    },
                    (Some(_), None) => match dir {
                        SortDir::Asc => Ordering::Less,
                        SortDir::Desc => Ordering::Greater,
                    },
                };
                primary.then(b.product_id.cmp(&a.product_id))
            });

            if let Some(bound) = &query.bound {
                let bound_value = match bound.value {
                    SqlValue::Float(v) => v,
                    _ => return Err(QueryError::InvalidCursor("wrong value type".into())),
                };
                rows.retain(|row| match Self::sort_key(query, row) {
                    // A NULL key never satisfies the bound comparison.
                    None => false,
                    Some(key) if key == bound_value => i64::from(row.product_id) < bound.id,
                    Some(key) => match dir {
                        SortDir::Asc => key > bound_value,
                        SortDir::Desc => key < bound_value,
                    },
                });
            }

            rows.truncate(query.limit as usize);
            Ok(rows)
        }

        async fn count_all(&self, _query: &PageQuery) -> Result<i64, QueryError> {
            Ok(self.rows.len() as i64)
        }
    }

    async fn walk_ids(executor: &MemCatalog, sort: ProductSort) -> Vec<i32> {
        let mut walked = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = search_products(
                executor,
                "zinc",
                &ProductFilters::default(),
                sort,
                2,
                cursor.as_deref(),
            )
            .await
            .unwrap();
            walked.extend(page.items.iter().map(|p| p.product_id));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        walked
    }

    #[tokio::test]
    async fn test_price_walk_covers_products_without_variants() {
        // Products 2 and 3 have no variants, so their aggregated price is
        // NULL in the store and 0 under the coalesced sort key. The walk must
        // still emit every product exactly once when a page boundary lands on
        // one of them.
        let executor = MemCatalog {
            rows: vec![summary(1, Some(10.0)), summary(2, None), summary(3, None)],
        };

        assert_eq!(
            walk_ids(&executor, ProductSort::PriceAsc).await,
            vec![3, 2, 1]
        );
        assert_eq!(
            walk_ids(&executor, ProductSort::PriceDesc).await,
            vec![1, 3, 2]
        );
    }
}
