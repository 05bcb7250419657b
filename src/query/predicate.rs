// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Typed filter predicates.
//!
//! Filters are explicit objects (kind + operands) folded into a single
//! conjunctive clause at render time. Column names are compile-time
//! constants; every operand becomes a numbered bind parameter, so request
//! values never appear in the SQL text.

use crate::query::{CursorValue, QueryError};
use chrono::{DateTime, Utc};

/// A value bound into the query as a numbered parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl TryFrom<&CursorValue> for SqlValue {
    type Error = QueryError;

    fn try_from(value: &CursorValue) -> Result<Self, Self::Error> {
        match value {
            CursorValue::Int(v) => Ok(SqlValue::Int(*v)),
            CursorValue::Float(v) => Ok(SqlValue::Float(*v)),
            CursorValue::Timestamp(micros) => DateTime::from_timestamp_micros(*micros)
                .map(SqlValue::Timestamp)
                .ok_or_else(|| {
                    QueryError::InvalidCursor(format!("timestamp out of range: {micros}"))
                }),
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Eq {
        column: &'static str,
        value: SqlValue,
    },
    /// `column >= value`
    GtEq {
        column: &'static str,
        value: SqlValue,
    },
    /// `column <= value`
    LtEq {
        column: &'static str,
        value: SqlValue,
    },
    /// Case-insensitive substring match over one or more columns, OR-joined
    /// inside a single parenthesized group.
    TextMatch {
        columns: &'static [&'static str],
        pattern: String,
    },
}

impl Predicate {
    /// Render this predicate, appending its operands to `binds`.
    pub fn render(&self, binds: &mut Vec<SqlValue>) -> String {
        match self {
            Predicate::Eq { column, value } => {
                binds.push(value.clone());
                format!("{column} = ${}", binds.len())
            }
            Predicate::GtEq { column, value } => {
                binds.push(value.clone());
                format!("{column} >= ${}", binds.len())
            }
            Predicate::LtEq { column, value } => {
                binds.push(value.clone());
                format!("{column} <= ${}", binds.len())
            }
            Predicate::TextMatch { columns, pattern } => {
                binds.push(SqlValue::Text(pattern.clone()));
                let placeholder = binds.len();
                let parts: Vec<String> = columns
                    .iter()
                    .map(|column| format!("{column} ILIKE ${placeholder}"))
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }
}

/// Fold predicates into one conjunctive clause. `None` when the list is empty.
pub fn fold_conjunction(predicates: &[Predicate], binds: &mut Vec<SqlValue>) -> Option<String> {
    if predicates.is_empty() {
        return None;
    }
    let parts: Vec<String> = predicates.iter().map(|p| p.render(binds)).collect();
    Some(parts.join(" AND "))
}
