// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Category tree and category lookups.

use crate::models::catalog::{CategoryNode, CategoryRow, TopCategory};
use crate::query::QueryError;
use crate::services::db_error;
use sqlx::PgPool;

const CATEGORY_COLUMNS: &str =
    "category_id, name, parent_category_id, description";

/// Fetch all categories and assemble the parent/child tree in memory.
pub async fn category_tree(pool: &PgPool) -> Result<Vec<CategoryNode>, QueryError> {
    let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name ASC"
    ))
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    Ok(build_tree(&rows, None))
}

fn build_tree(rows: &[CategoryRow], parent_id: Option<i32>) -> Vec<CategoryNode> {
    rows.iter()
        .filter(|row| row.parent_category_id == parent_id)
        .map(|row| CategoryNode {
            category: row.clone(),
            children: build_tree(rows, Some(row.category_id)),
        })
        .collect()
}

pub async fn category(pool: &PgPool, category_id: i64) -> Result<Option<CategoryRow>, QueryError> {
    sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE category_id = $1"
    ))
    .bind(category_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error)
}

pub async fn subcategories(pool: &PgPool, category_id: i64) -> Result<Vec<CategoryRow>, QueryError> {
    sqlx::query_as(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories WHERE parent_category_id = $1 ORDER BY name ASC"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

/// Categories ranked by how many products they contain.
pub async fn top_categories(pool: &PgPool, limit: i64) -> Result<Vec<TopCategory>, QueryError> {
    sqlx::query_as(
        "SELECT c.category_id AS category_id, c.name AS name, \
                COUNT(pc.product_id) AS product_count \
         FROM categories c \
         LEFT JOIN product_categories pc ON c.category_id = pc.category_id \
         GROUP BY c.category_id, c.name \
         ORDER BY COUNT(pc.product_id) DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i32, parent: Option<i32>, name: &str) -> CategoryRow {
        CategoryRow {
            category_id: id,
            name: name.to_string(),
            parent_category_id: parent,
            description: None,
        }
    }

    #[test]
    fn test_tree_nests_children_under_parents() {
        let rows = vec![
            row(1, None, "Supplements"),
            row(2, Some(1), "Minerals"),
            row(3, Some(2), "Zinc"),
            row(4, None, "Beauty"),
        ];
        let tree = build_tree(&rows, None);
        assert_eq!(tree.len(), 2);
        let supplements = &tree[0];
        assert_eq!(supplements.category.category_id, 1);
        assert_eq!(supplements.children.len(), 1);
        assert_eq!(supplements.children[0].children[0].category.name, "Zinc");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_orphan_parents_are_excluded_from_root() {
        let rows = vec![row(2, Some(99), "Dangling")];
        assert!(build_tree(&rows, None).is_empty());
    }
}
