//! HTTP request handlers for the proxy server.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use super::AppState;
use crate::models::ListingProduct;
use crate::scrapers::{ListingQuery, ListingSource, ScrapeError};

/// Raw query string of a listing request.
///
/// Values stay strings here so that a malformed number is reported through
/// the same JSON error shape as every other failure.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub keyword: Option<String>,
}

/// Any listing failure, rendered as `500 {"error": message}`.
#[derive(Debug)]
pub struct ApiError(ScrapeError);

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/coupang?page=&limit=`
pub async fn coupang_products(
    State(state): State<AppState>,
    query: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<Vec<ListingProduct>>, ApiError> {
    let params = listing_params(&state.coupang, query)?;
    // Coupang listings take no keyword.
    let params = ListingParams {
        keyword: None,
        ..params
    };
    fetch_listing(&state, &state.coupang, &params).await
}

/// `GET /api/naver?keyword=&page=&limit=`
pub async fn naver_products(
    State(state): State<AppState>,
    query: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<Vec<ListingProduct>>, ApiError> {
    let params = listing_params(&state.naver, query)?;
    fetch_listing(&state, &state.naver, &params).await
}

/// Unwrap the query string, reporting a malformed one as an invalid query.
fn listing_params(
    source: &ListingSource,
    query: Result<Query<ListingParams>, QueryRejection>,
) -> Result<ListingParams, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            warn!("[{}] rejected query string: {}", source.source, rejection);
            Err(ScrapeError::InvalidQuery(rejection.body_text()).into())
        }
    }
}

async fn fetch_listing(
    state: &AppState,
    source: &ListingSource,
    params: &ListingParams,
) -> Result<Json<Vec<ListingProduct>>, ApiError> {
    let result = match ListingQuery::from_params(
        params.page.as_deref(),
        params.limit.as_deref(),
        params.keyword.as_deref(),
    ) {
        Ok(query) => source.fetch(&state.client, &query).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(products) => Ok(Json(products)),
        Err(e) => {
            warn!("[{}] listing request failed: {}", source.source, e);
            Err(e.into())
        }
    }
}
