// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod catalog;
pub mod completion;
pub mod db;
pub mod fallback;
pub mod filter;
pub mod history;
pub mod interpreter;
pub mod logging;
pub mod ranker;
pub mod search;
pub mod suggestions;
pub mod vocabulary;
