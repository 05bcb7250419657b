// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod catalog;
pub mod config;
pub mod order;
pub mod pagination;
pub mod question;
pub mod review;
pub mod session;
pub mod version;
