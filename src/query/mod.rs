// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Cursor pagination and dynamic filter composition.
//!
//! Translates search criteria plus an optional opaque cursor into a bounded,
//! strictly ordered page against PostgreSQL. Ordering is always the primary
//! sort key followed by the row id descending, so no two rows ever compare
//! equal and a cursor identifies a unique position in the order.
//!
//! Queries are assembled from typed [`Predicate`]s and rendered with numbered
//! bind parameters; user input never reaches the SQL text. Execution goes
//! through the [`QueryExecutor`] trait so tests can substitute an in-memory
//! store for the real pool.

pub mod cursor;
pub mod executor;
pub mod page;
pub mod predicate;

pub use cursor::{Cursor, CursorValue};
pub use executor::PgExecutor;
pub use page::{
    apply_cursor, clamp_page_size, fetch_page, CursorBound, OrderSpec, Page, PageQuery,
    QueryExecutor, RenderedQuery, SortDir, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use predicate::{Predicate, SqlValue};

use thiserror::Error;

/// Errors surfaced by the pagination and filter composer.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The cursor could not be decoded, or it was produced under a different
    /// sort mode than the request. Reported before any query is executed.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// The underlying read failed. No retry is attempted here; retry policy,
    /// if any, belongs to the database client.
    #[error("data store unavailable: {0}")]
    DataStoreUnavailable(String),
}
