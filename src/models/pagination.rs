// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Pagination metadata and the sort modes exposed by the API.

use crate::query::Page;
use serde::{Deserialize, Serialize};

/// Pagination block attached to every paged response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: i64,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl PageMeta {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            total_items: page.total_items,
            has_next_page: page.next_cursor.is_some(),
            next_cursor: page.next_cursor.clone(),
        }
    }
}

/// Product listing sort modes. The wire names are the query-string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Popularity,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl ProductSort {
    /// Tag baked into cursors issued under this sort.
    pub fn tag(self) -> &'static str {
        match self {
            ProductSort::Popularity => "popularity",
            ProductSort::PriceAsc => "price_asc",
            ProductSort::PriceDesc => "price_desc",
            ProductSort::Newest => "newest",
        }
    }
}

/// Review sort modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Helpful,
    Recent,
    Highest,
    Lowest,
}

impl ReviewSort {
    pub fn tag(self) -> &'static str {
        match self {
            ReviewSort::Helpful => "helpful",
            ReviewSort::Recent => "recent",
            ReviewSort::Highest => "highest",
            ReviewSort::Lowest => "lowest",
        }
    }
}

/// Question sort modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSort {
    #[default]
    Votes,
    Recent,
}

impl QuestionSort {
    pub fn tag(self) -> &'static str {
        match self {
            QuestionSort::Votes => "votes",
            QuestionSort::Recent => "recent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_modes_deserialize_from_wire_names() {
        let sort: ProductSort = serde_json::from_str("\"price_asc\"").unwrap();
        assert_eq!(sort, ProductSort::PriceAsc);
        let sort: ReviewSort = serde_json::from_str("\"helpful\"").unwrap();
        assert_eq!(sort, ReviewSort::Helpful);
        assert!(serde_json::from_str::<ProductSort>("\"alphabetical\"").is_err());
    }

    #[test]
    fn test_page_meta_mirrors_cursor_presence() {
        let page = Page {
            items: vec![1, 2],
            total_items: 10,
            next_cursor: Some("abc".to_string()),
        };
        let meta = PageMeta::of(&page);
        assert!(meta.has_next_page);
        assert_eq!(meta.next_cursor.as_deref(), Some("abc"));

        let done: Page<i32> = Page {
            items: vec![],
            total_items: 10,
            next_cursor: None,
        };
        assert!(!PageMeta::of(&done).has_next_page);
    }
}
