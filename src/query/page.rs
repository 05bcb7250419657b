// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Page query assembly and execution.
//!
//! A [`PageQuery`] describes one paged read: a projection over a join tree,
//! typed filters, an order (primary key + id tiebreak) and an optional
//! cursor bound. [`fetch_page`] requests one row past the page size; the
//! extra row only signals that another page exists and is never returned.
//! The next cursor is derived from the last emitted row, so resuming yields
//! the following page with no gaps or duplicates while the data is stable.

use crate::query::cursor::{Cursor, CursorValue};
use crate::query::predicate::{fold_conjunction, Predicate, SqlValue};
use crate::query::QueryError;
use async_trait::async_trait;

/// Hard cap on the page size a caller can request.
pub const MAX_PAGE_SIZE: i64 = 100;
/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Clamp a requested page size into the allowed range.
pub fn clamp_page_size(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }

    /// Comparison operator for the cursor bound: rows strictly past the
    /// cursor position in sort direction.
    fn bound_cmp(self) -> &'static str {
        match self {
            SortDir::Asc => ">",
            SortDir::Desc => "<",
        }
    }
}

/// The total order rows are returned in: primary key, then id descending.
#[derive(Debug, Clone)]
pub struct OrderSpec {
    /// Primary sort expression, e.g. `r.helpful_votes` or `MIN(pv.price)`.
    pub expr: &'static str,
    pub dir: SortDir,
    /// True when `expr` aggregates over grouped rows; the cursor bound must
    /// then be applied after grouping (HAVING), never before.
    pub aggregate: bool,
    /// Unique id column used as the descending tiebreak.
    pub tiebreak: &'static str,
}

/// Position extracted from a decoded cursor: resume strictly after this row.
#[derive(Debug, Clone)]
pub struct CursorBound {
    pub value: SqlValue,
    pub id: i64,
}

/// One paged read, assembled by a service and rendered here.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub projection: &'static str,
    /// FROM clause including joins. May grow conditional joins, but never
    /// contains request values.
    pub from: String,
    /// Pre-aggregation filters (WHERE).
    pub filters: Vec<Predicate>,
    /// Post-aggregation filters (HAVING), for conditions over aggregates
    /// such as the minimum variant price.
    pub having: Vec<Predicate>,
    pub group_by: Option<&'static str>,
    pub order: OrderSpec,
    pub bound: Option<CursorBound>,
    pub limit: i64,
}

/// SQL text plus its bind parameters, ready for execution.
#[derive(Debug, Clone)]
pub struct RenderedQuery {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

impl PageQuery {
    /// Render the paged SELECT.
    pub fn render(&self) -> RenderedQuery {
        let mut binds = Vec::new();
        let mut sql = format!("SELECT {} FROM {}", self.projection, self.from);

        let mut where_clause = fold_conjunction(&self.filters, &mut binds);
        if let (Some(bound), false) = (&self.bound, self.order.aggregate) {
            let bound_sql = self.render_bound(bound, &mut binds);
            where_clause = Some(match where_clause {
                Some(clause) => format!("{clause} AND {bound_sql}"),
                None => bound_sql,
            });
        }
        if let Some(clause) = where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }

        if let Some(group_by) = self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }

        let mut having_clause = fold_conjunction(&self.having, &mut binds);
        if let (Some(bound), true) = (&self.bound, self.order.aggregate) {
            let bound_sql = self.render_bound(bound, &mut binds);
            having_clause = Some(match having_clause {
                Some(clause) => format!("{clause} AND {bound_sql}"),
                None => bound_sql,
            });
        }
        if let Some(clause) = having_clause {
            sql.push_str(" HAVING ");
            sql.push_str(&clause);
        }

        sql.push_str(&format!(
            " ORDER BY {} {}, {} DESC",
            self.order.expr,
            self.order.dir.keyword(),
            self.order.tiebreak
        ));

        binds.push(SqlValue::Int(self.limit));
        sql.push_str(&format!(" LIMIT ${}", binds.len()));

        RenderedQuery { sql, binds }
    }

    /// Render the best-effort total count for the same filter set.
    ///
    /// Post-aggregation filters are intentionally omitted, matching the
    /// paged query only up to grouping; the count is documented as an
    /// estimate, not an exact figure under concurrent writes.
    pub fn render_count(&self) -> RenderedQuery {
        let mut binds = Vec::new();
        let mut sql = format!(
            "SELECT COUNT(DISTINCT {}) FROM {}",
            self.order.tiebreak, self.from
        );
        if let Some(clause) = fold_conjunction(&self.filters, &mut binds) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        RenderedQuery { sql, binds }
    }

    /// `(key <cmp> v OR (key = v AND id < lastId))` — strictly past the
    /// cursor position under the combined (key, id desc) order.
    fn render_bound(&self, bound: &CursorBound, binds: &mut Vec<SqlValue>) -> String {
        binds.push(bound.value.clone());
        let value_ph = binds.len();
        binds.push(SqlValue::Int(bound.id));
        let id_ph = binds.len();
        format!(
            "({expr} {cmp} ${value_ph} OR ({expr} = ${value_ph} AND {tiebreak} < ${id_ph}))",
            expr = self.order.expr,
            cmp = self.order.dir.bound_cmp(),
            tiebreak = self.order.tiebreak,
        )
    }
}

/// Executes rendered page queries. The production implementation wraps the
/// PostgreSQL pool; tests substitute an in-memory store.
#[async_trait]
pub trait QueryExecutor<T>: Send + Sync {
    async fn fetch_rows(&self, query: &PageQuery) -> Result<Vec<T>, QueryError>;
    async fn count_all(&self, query: &PageQuery) -> Result<i64, QueryError>;
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// At most the requested page size.
    pub items: Vec<T>,
    /// Best-effort total across all pages for the same filters.
    pub total_items: i64,
    /// Present iff more rows exist beyond this page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            next_cursor: None,
        }
    }
}

/// Decode and validate a cursor against the active sort, then install it as
/// the query bound. Rejection happens before any query executes.
pub fn apply_cursor(
    query: &mut PageQuery,
    cursor: Option<&str>,
    sort_tag: &str,
) -> Result<(), QueryError> {
    if let Some(token) = cursor {
        let cursor = Cursor::decode(token)?;
        cursor.expect_sort(sort_tag)?;
        query.bound = Some(CursorBound {
            value: SqlValue::try_from(&cursor.value)?,
            id: cursor.id,
        });
    }
    Ok(())
}

/// Fetch one page: request `limit + 1` rows, truncate, and derive the next
/// cursor from the last emitted row via `row_key` (id + sort value).
pub async fn fetch_page<T, E, F>(
    executor: &E,
    mut query: PageQuery,
    sort_tag: &str,
    row_key: F,
) -> Result<Page<T>, QueryError>
where
    E: QueryExecutor<T> + ?Sized,
    F: Fn(&T) -> (i64, CursorValue),
{
    let page_size = query.limit;
    query.limit = page_size + 1;

    let mut items = executor.fetch_rows(&query).await?;
    let total_items = executor.count_all(&query).await?;

    let has_next = items.len() as i64 > page_size;
    if has_next {
        items.truncate(page_size as usize);
    }
    let next_cursor = if has_next {
        items.last().map(|row| {
            let (id, value) = row_key(row);
            Cursor::new(sort_tag, id, value).encode()
        })
    } else {
        None
    };

    Ok(Page {
        items,
        total_items,
        next_cursor,
    })
}
