// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Cursor-paged product reviews.

use crate::models::pagination::ReviewSort;
use crate::models::review::{Review, ReviewImage, ReviewRow};
use crate::query::{
    apply_cursor, fetch_page, CursorValue, OrderSpec, Page, PageQuery, Predicate, QueryError,
    QueryExecutor, SortDir, SqlValue,
};
use crate::services::db_error;
use sqlx::PgPool;

const REVIEW_PROJECTION: &str = "r.review_id AS review_id, r.rating AS rating, \
     r.review_title AS review_title, r.review_text AS review_text, \
     r.review_date AS review_date, r.helpful_votes AS helpful_votes, \
     r.not_helpful_votes AS not_helpful_votes, \
     r.is_verified_purchase AS is_verified_purchase, u.name AS user_name, \
     r.reviewer_location AS reviewer_location";

const REVIEW_FROM: &str = "reviews r INNER JOIN \"user\" u ON r.user_id = u.id";

fn review_order(sort: ReviewSort) -> OrderSpec {
    let (expr, dir) = match sort {
        ReviewSort::Helpful => ("r.helpful_votes", SortDir::Desc),
        ReviewSort::Recent => ("r.review_date", SortDir::Desc),
        ReviewSort::Highest => ("r.rating", SortDir::Desc),
        ReviewSort::Lowest => ("r.rating", SortDir::Asc),
    };
    OrderSpec {
        expr,
        dir,
        aggregate: false,
        tiebreak: "r.review_id",
    }
}

fn review_cursor_value(sort: ReviewSort, row: &ReviewRow) -> CursorValue {
    match sort {
        ReviewSort::Helpful => CursorValue::Int(i64::from(row.helpful_votes)),
        ReviewSort::Recent => CursorValue::Timestamp(row.review_date.timestamp_micros()),
        ReviewSort::Highest | ReviewSort::Lowest => CursorValue::Int(i64::from(row.rating)),
    }
}

/// Fetch one page of reviews for a product.
pub async fn review_page<E>(
    executor: &E,
    product_id: i64,
    sort: ReviewSort,
    page_size: i64,
    cursor: Option<&str>,
) -> Result<Page<ReviewRow>, QueryError>
where
    E: QueryExecutor<ReviewRow> + ?Sized,
{
    let mut query = PageQuery {
        projection: REVIEW_PROJECTION,
        from: REVIEW_FROM.to_string(),
        filters: vec![Predicate::Eq {
            column: "r.product_id",
            value: SqlValue::Int(product_id),
        }],
        having: Vec::new(),
        group_by: None,
        order: review_order(sort),
        bound: None,
        limit: page_size,
    };
    apply_cursor(&mut query, cursor, sort.tag())?;
    fetch_page(executor, query, sort.tag(), |row| {
        (i64::from(row.review_id), review_cursor_value(sort, row))
    })
    .await
}

/// Attach images to the reviews actually emitted on the page.
pub async fn attach_images(pool: &PgPool, rows: Vec<ReviewRow>) -> Result<Vec<Review>, QueryError> {
    let mut reviews = Vec::with_capacity(rows.len());
    for review in rows {
        let images: Vec<ReviewImage> = sqlx::query_as(
            "SELECT review_image_id, image_url, alt_text \
             FROM review_images WHERE review_id = $1",
        )
        .bind(review.review_id)
        .fetch_all(pool)
        .await
        .map_err(db_error)?;
        reviews.push(Review { review, images });
    }
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Cursor;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    struct MemReviews {
        rows: Vec<ReviewRow>,
    }

    fn review(id: i32, rating: i32, helpful: i32) -> ReviewRow {
        ReviewRow {
            review_id: id,
            rating,
            review_title: None,
            review_text: None,
            review_date: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, id as u32 % 60).unwrap(),
            helpful_votes: helpful,
            not_helpful_votes: 0,
            is_verified_purchase: false,
            user_name: "pat".to_string(),
            reviewer_location: None,
        }
    }

    #[async_trait]
    impl QueryExecutor<ReviewRow> for MemReviews {
        async fn fetch_rows(&self, query: &PageQuery) -> Result<Vec<ReviewRow>, QueryError> {
            let sort_value = |row: &ReviewRow| match query.order.expr {
                "r.helpful_votes" => i64::from(row.helpful_votes),
                "r.rating" => i64::from(row.rating),
                _ => row.review_date.timestamp_micros(),
            };
            let mut rows = self.rows.clone();
            rows.sort_by(|a, b| {
                let primary = match query.order.dir {
                    SortDir::Asc => sort_value(a).cmp(&sort_value(b)),
                    SortDir::Desc => sort_value(b).cmp(&sort_value(a)),
                };
                primary.then(b.review_id.cmp(&a.review_id))
            });
            if let Some(bound) = &query.bound {
                let bound_value = match bound.value {
                    SqlValue::Int(v) => v,
                    SqlValue::Timestamp(t) => t.timestamp_micros(),
                    _ => return Err(QueryError::InvalidCursor("wrong value type".into())),
                };
                rows.retain(|row| {
                    let value = sort_value(row);
                    if value == bound_value {
                        i64::from(row.review_id) < bound.id
                    } else {
                        match query.order.dir {
                            SortDir::Asc => value > bound_value,
                            SortDir::Desc => value < bound_value,
                        }
                    }
                });
            }
            rows.truncate(query.limit as usize);
            Ok(rows)
        }

        async fn count_all(&self, _query: &PageQuery) -> Result<i64, QueryError> {
            Ok(self.rows.len() as i64)
        }
    }

    #[tokio::test]
    async fn test_helpful_pages_resume_without_repeats() {
        let executor = MemReviews {
            rows: vec![
                review(1, 5, 12),
                review(2, 4, 12),
                review(3, 3, 7),
                review(4, 5, 7),
                review(5, 2, 1),
            ],
        };

        let page1 = review_page(&executor, 1, ReviewSort::Helpful, 2, None)
            .await
            .unwrap();
        let ids: Vec<i32> = page1.items.iter().map(|r| r.review_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(page1.total_items, 5);

        let page2 = review_page(&executor, 1, ReviewSort::Helpful, 2, page1.next_cursor.as_deref())
            .await
            .unwrap();
        let ids: Vec<i32> = page2.items.iter().map(|r| r.review_id).collect();
        assert_eq!(ids, vec![4, 3]);

        let page3 = review_page(&executor, 1, ReviewSort::Helpful, 2, page2.next_cursor.as_deref())
            .await
            .unwrap();
        let ids: Vec<i32> = page3.items.iter().map(|r| r.review_id).collect();
        assert_eq!(ids, vec![5]);
        assert!(page3.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_lowest_sort_ascends_by_rating() {
        let executor = MemReviews {
            rows: vec![review(1, 5, 0), review(2, 1, 0), review(3, 3, 0)],
        };
        let page = review_page(&executor, 1, ReviewSort::Lowest, 10, None)
            .await
            .unwrap();
        let ratings: Vec<i32> = page.items.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_cursor_from_other_sort_is_rejected() {
        let executor = MemReviews { rows: Vec::new() };
        let token = Cursor::new("recent", 3, CursorValue::Timestamp(5)).encode();
        let err = review_page(&executor, 1, ReviewSort::Helpful, 2, Some(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidCursor(_)));
    }
}
