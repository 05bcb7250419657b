// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod addresses;
pub mod brands;
pub mod catalog;
pub mod categories;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod questions;
pub mod recommendations;
pub mod reviews;
pub mod session;

use crate::query::QueryError;

pub(crate) fn db_error(e: sqlx::Error) -> QueryError {
    QueryError::DataStoreUnavailable(e.to_string())
}
