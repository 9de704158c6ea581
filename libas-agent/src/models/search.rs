// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::entities::EntitySet;
use crate::models::product::ProductRecord;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of results per page
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page a caller may request
pub const MAX_LIMIT: u32 = 100;

/// Request to search the catalog with a natural-language query
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Free-text query, e.g. "red silk kurta for women under 5000"
    pub query: String,
    /// Maximum number of results to return (default: 20)
    pub limit: Option<u32>,
    /// Zero-based offset for pagination (default: 0)
    pub offset: Option<u32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
            offset: None,
        }
    }

    /// Requested page, with defaults applied and the limit clamped
    pub fn page(&self) -> PageRange {
        PageRange::new(
            self.limit.unwrap_or(DEFAULT_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

/// A window over the ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub limit: u32,
    pub offset: u32,
}

impl PageRange {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset,
        }
    }

    /// Inclusive index of the last row in the page
    pub fn last_index(&self) -> u32 {
        self.offset.saturating_add(self.limit - 1)
    }
}

/// Successful search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    /// The query as received
    pub query: String,
    /// Attributes the query was interpreted as
    pub entities: EntitySet,
    /// Number of matching products before pagination
    pub total: u64,
    /// Number of products in this page
    pub returned: usize,
    /// Matching products, most relevant first
    pub results: Vec<ProductRecord>,
}

/// Failed search response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchErrorResponse {
    pub success: bool,
    pub error: String,
    /// Developer-facing detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl SearchErrorResponse {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

/// Query parameters for the popular searches endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularSearchesParams {
    /// Number of queries to return (default: 3)
    pub limit: Option<u32>,
}

/// Most frequent recent queries
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PopularSearchesResponse {
    pub queries: Vec<String>,
}

/// Query parameters for the suggestions endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionsParams {
    /// Partial user input
    pub q: String,
    /// Number of suggestions to return (default: 5)
    pub limit: Option<u32>,
}

/// Autocomplete suggestions for partial input
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}
