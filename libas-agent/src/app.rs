// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::entities::{EntitySet, Gender};
use crate::models::product::{
    FacetsResponse, ProductFilterRequest, ProductListResponse, ProductRecord,
};
use crate::models::search::{
    PopularSearchesParams, PopularSearchesResponse, SearchErrorResponse, SearchRequest,
    SearchResponse, SuggestionsParams, SuggestionsResponse,
};
use crate::models::version::VersionResponse;
use crate::services::filter::ProductFilter;
use crate::services::history::{self, SearchHistory};
use crate::services::search::SearchService;
use crate::services::suggestions::{self, DEFAULT_SUGGESTIONS};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `LIBAS_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("LIBAS_VERSION");

const DEFAULT_POPULAR_LIMIT: u32 = 3;
const MAX_POPULAR_LIMIT: u32 = 50;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    /// Search tracking; popular searches are unavailable without it.
    pub history: Option<Arc<dyn SearchHistory>>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Service version", body = VersionResponse))
)]
pub async fn version_handler(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "libas-agent".to_string(),
        version: VERSION.to_string(),
        completion_enabled: state.search.interpreter().has_completion(),
    })
}

#[utoipa::path(
    post,
    path = "/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked matching products", body = SearchResponse),
        (status = 400, description = "Missing query or malformed request body", body = SearchErrorResponse),
        (status = 500, description = "Product store failure", body = SearchErrorResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<SearchErrorResponse>)> {
    let Json(payload) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(SearchErrorResponse::new(
                "Query is required",
                Some(rejection.body_text()),
            )),
        )
    })?;

    let response = state.search.search(&payload).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SearchErrorResponse::new(
                "Search unavailable",
                Some(e.to_string()),
            )),
        )
    })?;

    if let Some(history) = &state.history {
        history::track_search(history.as_ref(), &payload.query).await;
    }

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/search/popular",
    params(PopularSearchesParams),
    responses(
        (status = 200, description = "Most frequent recent queries", body = PopularSearchesResponse),
        (status = 503, description = "Search history is not configured")
    )
)]
pub async fn popular_searches_handler(
    State(state): State<AppState>,
    Query(params): Query<PopularSearchesParams>,
) -> Result<Json<PopularSearchesResponse>, (StatusCode, String)> {
    let history = state.history.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Search history is not available".to_string(),
        )
    })?;

    let limit = params
        .limit
        .unwrap_or(DEFAULT_POPULAR_LIMIT)
        .clamp(1, MAX_POPULAR_LIMIT);
    let queries = history::popular_searches(history.as_ref(), limit).await;

    Ok(Json(PopularSearchesResponse { queries }))
}

#[utoipa::path(
    get,
    path = "/search/suggestions",
    params(SuggestionsParams),
    responses(
        (status = 200, description = "Autocomplete suggestions", body = SuggestionsResponse),
        (status = 500, description = "Product store failure")
    )
)]
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestionsParams>,
) -> Result<Json<SuggestionsResponse>, (StatusCode, String)> {
    let suggestions = suggestions::suggest(
        state.search.store().as_ref(),
        &params.q,
        params.limit.unwrap_or(DEFAULT_SUGGESTIONS),
    )
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Suggestion error: {e}"),
        )
    })?;

    Ok(Json(SuggestionsResponse { suggestions }))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "In-stock product", body = ProductRecord),
        (status = 404, description = "No such in-stock product")
    )
)]
pub async fn product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductRecord>, (StatusCode, String)> {
    state
        .search
        .store()
        .get_product(id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            )
        })?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Product {id} not found")))
}

#[utoipa::path(
    post,
    path = "/products/filter",
    request_body = ProductFilterRequest,
    responses(
        (status = 200, description = "In-stock products matching the filter, newest first", body = ProductListResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Product store failure")
    )
)]
pub async fn filter_products_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProductFilterRequest>, JsonRejection>,
) -> Result<Json<ProductListResponse>, (StatusCode, String)> {
    let Json(request) =
        payload.map_err(|rejection| (StatusCode::BAD_REQUEST, rejection.body_text()))?;

    let filter = ProductFilter::from_request(&request);
    let page = state
        .search
        .store()
        .find_products(&filter, request.page())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            )
        })?;

    tracing::debug!(total = page.total, "Filtered products");

    Ok(Json(ProductListResponse {
        total: page.total,
        returned: page.products.len(),
        products: page.products,
    }))
}

#[utoipa::path(
    get,
    path = "/facets",
    responses(
        (status = 200, description = "Filter values of in-stock products", body = FacetsResponse),
        (status = 500, description = "Product store failure")
    )
)]
pub async fn facets_handler(
    State(state): State<AppState>,
) -> Result<Json<FacetsResponse>, (StatusCode, String)> {
    state.search.store().facets().await.map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database error: {e}"),
        )
    })
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        version_handler,
        search_handler,
        popular_searches_handler,
        suggestions_handler,
        product_handler,
        filter_products_handler,
        facets_handler
    ),
    components(schemas(
        EntitySet,
        Gender,
        ProductRecord,
        FacetsResponse,
        ProductFilterRequest,
        ProductListResponse,
        SearchRequest,
        SearchResponse,
        SearchErrorResponse,
        PopularSearchesResponse,
        SuggestionsResponse,
        VersionResponse
    ))
)]
pub struct ApiDoc;

/// Build the Axum application router, with Swagger UI at `/swagger-ui`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/search", post(search_handler))
        .route("/search/popular", get(popular_searches_handler))
        .route("/search/suggestions", get(suggestions_handler))
        .route("/products/filter", post(filter_products_handler))
        .route("/products/{id}", get(product_handler))
        .route("/facets", get(facets_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MemoryProductStore;
    use crate::services::interpreter::QueryInterpreter;

    fn state() -> AppState {
        AppState {
            search: Arc::new(SearchService::new(
                QueryInterpreter::fallback_only(),
                Arc::new(MemoryProductStore::default()),
            )),
            history: None,
        }
    }

    #[tokio::test]
    async fn test_version_handler() {
        let Json(version) = version_handler(State(state())).await;
        assert_eq!(version.agent, "libas-agent");
        assert_eq!(version.version, VERSION);
        assert!(!version.completion_enabled);
    }

    #[tokio::test]
    async fn test_popular_requires_history() {
        let err = popular_searches_handler(State(state()), Query(PopularSearchesParams { limit: None }))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/version",
            "/search",
            "/search/popular",
            "/search/suggestions",
            "/products/{id}",
            "/products/filter",
            "/facets",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
