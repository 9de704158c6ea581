// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for the search pipeline.
//!
//! | Error | Raised by | Handling |
//! |-------|-----------|----------|
//! | `ExtractionError` | completion endpoint, reply parsing | recovered with fallback extraction |
//! | `StoreError` | product store, search history | fatal for the request |
//! | `SearchError` | search orchestration | mapped to a 500 "Search unavailable" |

use thiserror::Error;

/// Failure of the language-model entity extractor
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion reply was empty")]
    EmptyReply,

    #[error("completion reply contains no JSON object")]
    NoJsonObject,

    #[error("completion reply does not match the entity schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Failure of the product store or the search history table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid product record: {0}")]
    InvalidRecord(String),

    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a search request
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("product query failed: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_wraps_store_detail() {
        let err = SearchError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(
            err.to_string(),
            "product query failed: store backend unavailable: connection refused"
        );
    }

    #[test]
    fn test_schema_error_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ExtractionError::from(parse);
        assert!(err.to_string().starts_with("completion reply does not match"));
    }
}
