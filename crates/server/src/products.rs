//! Product catalog JSON routes.
//!
//! - `GET /api/products`                             list every product
//! - `GET /api/products/search?keyword=&page=&size=` keyword search
//! - `GET /api/products/{id}`                        lookup by id, 404 when unknown

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_core::domain::product::{Product, ProductId};
use catalog_core::errors::{ApplicationError, InterfaceError};
use catalog_core::search::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::search::ProductSearchService;

#[derive(Clone)]
pub struct ProductsState {
    service: ProductSearchService,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

/// Interface error rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        let error = match &self.0 {
            InterfaceError::NotFound { message, .. } => message.clone(),
            other => other.user_message().to_string(),
        };
        let body = ErrorBody { error, correlation_id: self.0.correlation_id().to_string() };

        (status, Json(body)).into_response()
    }
}

fn api_error(error: ApplicationError, correlation_id: String) -> ApiError {
    let interface = error.into_interface(correlation_id);
    match &interface {
        InterfaceError::NotFound { message, correlation_id } => {
            info!(
                event_name = "catalog.api.not_found",
                correlation_id = %correlation_id,
                message = %message,
                "requested product does not exist"
            );
        }
        other => {
            warn!(
                event_name = "catalog.api.error",
                correlation_id = %other.correlation_id(),
                error = %other,
                "catalog request failed"
            );
        }
    }
    ApiError(interface)
}

pub fn router(service: ProductSearchService) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/search", get(search_products))
        .route("/api/products/{id}", get(get_product))
        .with_state(ProductsState { service })
}

pub async fn list_products(
    State(state): State<ProductsState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let products = state
        .service
        .list_products()
        .await
        .map_err(|error| api_error(error, correlation_id))?;
    Ok(Json(products))
}

/// Requests that keep the default `page=0&size=10` run the name-only search,
/// anything else runs the paginated multi-field search.
pub async fn search_products(
    State(state): State<ProductsState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let keyword = query.keyword.as_deref();

    let result = if PageRequest::is_explicit(query.page, query.size) {
        state.service.search_products_paginated(keyword, query.page, query.size).await
    } else {
        state.service.search_products_by_name(keyword).await
    };

    let products = result.map_err(|error| api_error(error, correlation_id.clone()))?;
    info!(
        event_name = "catalog.api.search",
        correlation_id = %correlation_id,
        keyword = keyword.unwrap_or_default(),
        page = query.page,
        size = query.size,
        matches = products.len(),
        "product search served"
    );
    Ok(Json(products))
}

pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<ProductsState>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let product = state
        .service
        .get_product_by_id(ProductId(id))
        .await
        .map_err(|error| api_error(error, correlation_id))?;
    Ok(Json(product))
}
