// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::Serialize;
use sqlx::FromRow;

/// One key/value configuration entry. Soft-deleted rows are never returned.
#[derive(Debug, FromRow, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}
