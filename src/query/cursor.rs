// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Opaque page cursors.
//!
//! A cursor encodes the last row of the previous page under the active sort
//! order: the row id (the unique tiebreak) and the primary sort value. The
//! payload also carries a version and the sort tag it was issued for, so a
//! cursor replayed under a different sort mode is rejected instead of
//! silently corrupting the page order.
//!
//! The token is JSON wrapped in URL-safe base64. Consumers must treat it as
//! opaque; the internal layout may change between versions.

use crate::query::QueryError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Current cursor payload version. Bump when the layout changes.
pub const CURSOR_VERSION: u8 = 1;

/// The primary sort value captured in a cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum CursorValue {
    /// Integer sort keys: vote counts, review totals, integer ratings.
    Int(i64),
    /// Floating sort keys: aggregated prices, decimal ratings.
    Float(f64),
    /// Timestamp sort keys in microseconds since the Unix epoch.
    Timestamp(i64),
}

impl CursorValue {
    /// Compare two values of the same variant. Mismatched variants yield
    /// `None` (a malformed cursor, caught by the caller).
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (CursorValue::Int(a), CursorValue::Int(b)) => Some(a.cmp(b)),
            (CursorValue::Float(a), CursorValue::Float(b)) => a.partial_cmp(b),
            (CursorValue::Timestamp(a), CursorValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Decoded cursor payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub version: u8,
    /// Sort tag the cursor was issued under (e.g. "helpful", "price_asc").
    pub sort: String,
    /// Id of the last row on the previous page.
    pub id: i64,
    /// Primary sort value of that row.
    pub value: CursorValue,
}

impl Cursor {
    pub fn new(sort: &str, id: i64, value: CursorValue) -> Self {
        Self {
            version: CURSOR_VERSION,
            sort: sort.to_string(),
            id,
            value,
        }
    }

    /// Encode to an opaque URL-safe token.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("cursor payload is always serializable");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token. Any malformed input is a client error; the query is
    /// never executed with a cursor that failed to decode.
    pub fn decode(token: &str) -> Result<Self, QueryError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| QueryError::InvalidCursor(format!("bad encoding: {e}")))?;
        let cursor: Cursor = serde_json::from_slice(&bytes)
            .map_err(|e| QueryError::InvalidCursor(format!("bad payload: {e}")))?;
        if cursor.version != CURSOR_VERSION {
            return Err(QueryError::InvalidCursor(format!(
                "unsupported cursor version {}",
                cursor.version
            )));
        }
        Ok(cursor)
    }

    /// Reject cursors issued under a different sort mode.
    pub fn expect_sort(&self, sort: &str) -> Result<(), QueryError> {
        if self.sort == sort {
            Ok(())
        } else {
            Err(QueryError::InvalidCursor(format!(
                "cursor was issued for sort '{}' but the request sorts by '{}'",
                self.sort, sort
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = Cursor::new("helpful", 42, CursorValue::Int(17));
        let token = cursor.encode();
        let decoded = Cursor::decode(&token).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_round_trip_float_and_timestamp() {
        for value in [CursorValue::Float(12.99), CursorValue::Timestamp(1_700_000_000_000_000)] {
            let cursor = Cursor::new("price_asc", 7, value.clone());
            let decoded = Cursor::decode(&cursor.encode()).unwrap();
            assert_eq!(decoded.value, value);
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Cursor::decode("not base64!!"),
            Err(QueryError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_cursor_json() {
        let token = URL_SAFE_NO_PAD.encode(b"{\"foo\": 1}");
        assert!(matches!(
            Cursor::decode(&token),
            Err(QueryError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut cursor = Cursor::new("recent", 1, CursorValue::Int(5));
        cursor.version = 99;
        let json = serde_json::to_vec(&cursor).unwrap();
        let token = URL_SAFE_NO_PAD.encode(json);
        assert!(matches!(
            Cursor::decode(&token),
            Err(QueryError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_sort_mismatch_is_rejected() {
        let cursor = Cursor::new("price_asc", 10, CursorValue::Float(4.5));
        assert!(cursor.expect_sort("price_asc").is_ok());
        assert!(matches!(
            cursor.expect_sort("recent"),
            Err(QueryError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_value_compare_same_variant() {
        use std::cmp::Ordering;
        assert_eq!(
            CursorValue::Int(2).compare(&CursorValue::Int(3)),
            Some(Ordering::Less)
        );
        assert_eq!(
            CursorValue::Float(4.5).compare(&CursorValue::Float(4.5)),
            Some(Ordering::Equal)
        );
        assert_eq!(CursorValue::Int(1).compare(&CursorValue::Float(1.0)), None);
    }
}
