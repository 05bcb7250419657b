// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! PostgreSQL-backed query execution.

use crate::query::page::{PageQuery, QueryExecutor};
use crate::query::predicate::SqlValue;
use crate::query::QueryError;
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Postgres};

/// Runs rendered page queries against the connection pool.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_row_query<'q, O>(
    query: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    value: &SqlValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
    }
}

fn bind_scalar_query<'q>(
    query: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    value: &SqlValue,
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    match value {
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
    }
}

#[async_trait]
impl<T> QueryExecutor<T> for PgExecutor
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    async fn fetch_rows(&self, page_query: &PageQuery) -> Result<Vec<T>, QueryError> {
        let rendered = page_query.render();
        tracing::debug!(sql = %rendered.sql, binds = rendered.binds.len(), "page query");

        let mut query = sqlx::query_as::<Postgres, T>(&rendered.sql);
        for value in &rendered.binds {
            query = bind_row_query(query, value);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| QueryError::DataStoreUnavailable(e.to_string()))
    }

    async fn count_all(&self, page_query: &PageQuery) -> Result<i64, QueryError> {
        let rendered = page_query.render_count();

        let mut query = sqlx::query_scalar::<Postgres, i64>(&rendered.sql);
        for value in &rendered.binds {
            query = bind_scalar_query(query, value);
        }
        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| QueryError::DataStoreUnavailable(e.to_string()))
    }
}
