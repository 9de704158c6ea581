// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod entities;
pub mod product;
pub mod search;
pub mod version;
