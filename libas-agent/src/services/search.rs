// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::SearchError;
use crate::models::search::{SearchRequest, SearchResponse};
use crate::services::catalog::ProductStore;
use crate::services::filter::ProductFilter;
use crate::services::interpreter::QueryInterpreter;
use crate::services::ranker;
use std::sync::Arc;

/// Natural-language product search: interpret, filter, rank
#[derive(Clone)]
pub struct SearchService {
    interpreter: QueryInterpreter,
    store: Arc<dyn ProductStore>,
}

impl SearchService {
    pub fn new(interpreter: QueryInterpreter, store: Arc<dyn ProductStore>) -> Self {
        Self { interpreter, store }
    }

    pub fn interpreter(&self) -> &QueryInterpreter {
        &self.interpreter
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    /// Run one search request end to end.
    ///
    /// Extraction failures degrade to vocabulary matching; only a store
    /// failure fails the request.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        tracing::info!(query = %request.query, "Search request");

        let entities = self.interpreter.interpret(&request.query).await;
        tracing::debug!(?entities, "Interpreted query");

        let filter = ProductFilter::from_entities(&entities);
        let page = self
            .store
            .find_products(&filter, request.page())
            .await
            .inspect_err(|e| tracing::error!("Product query failed: {e}"))?;

        let results = ranker::rank(page.products, &entities);
        tracing::info!(
            total = page.total,
            returned = results.len(),
            "Search completed"
        );

        Ok(SearchResponse {
            success: true,
            query: request.query.clone(),
            entities,
            total: page.total,
            returned: results.len(),
            results,
        })
    }
}
