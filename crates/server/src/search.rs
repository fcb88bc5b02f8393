//! Product search service.
//!
//! The two keyword entry points treat a blank keyword differently: name-only
//! search returns the whole catalog, while multi-field search (paginated or not)
//! returns nothing. HTTP clients rely on both behaviors.

use std::sync::Arc;

use catalog_core::domain::product::{Product, ProductId};
use catalog_core::errors::{ApplicationError, DomainError};
use catalog_core::search::{Keyword, PageRequest};
use catalog_db::repositories::{ProductRepository, RepositoryError};
use tracing::debug;

#[derive(Clone)]
pub struct ProductSearchService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductSearchService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApplicationError> {
        self.repository.find_all().await.map_err(persistence)
    }

    /// Name-only search; a blank keyword returns every product.
    pub async fn search_products_by_name(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let Some(keyword) = Keyword::parse(keyword) else {
            debug!(
                event_name = "catalog.search.name.blank",
                "blank keyword, returning all products"
            );
            return self.list_products().await;
        };

        let products = self.repository.find_by_name_contains(&keyword).await.map_err(persistence)?;
        debug!(
            event_name = "catalog.search.name",
            keyword = keyword.as_str(),
            matches = products.len(),
            "name search completed"
        );
        Ok(products)
    }

    /// Name, description and category search; a blank keyword returns nothing.
    pub async fn search_products(
        &self,
        keyword: Option<&str>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let Some(keyword) = Keyword::parse(keyword) else {
            return Ok(Vec::new());
        };

        let products =
            self.repository.find_by_any_field_contains(&keyword).await.map_err(persistence)?;
        debug!(
            event_name = "catalog.search.any_field",
            keyword = keyword.as_str(),
            matches = products.len(),
            "multi-field search completed"
        );
        Ok(products)
    }

    pub async fn search_products_paginated(
        &self,
        keyword: Option<&str>,
        page: i64,
        size: i64,
    ) -> Result<Vec<Product>, ApplicationError> {
        let Some(keyword) = Keyword::parse(keyword) else {
            return Ok(Vec::new());
        };
        let Some(page_request) = PageRequest::new(page, size) else {
            debug!(
                event_name = "catalog.search.page.out_of_range",
                page,
                size,
                "pagination out of range, returning no products"
            );
            return Ok(Vec::new());
        };

        let products = self
            .repository
            .find_by_any_field_contains_page(&keyword, page_request)
            .await
            .map_err(persistence)?;
        debug!(
            event_name = "catalog.search.page",
            keyword = keyword.as_str(),
            page,
            size,
            matches = products.len(),
            "paginated search completed"
        );
        Ok(products)
    }

    pub async fn get_product_by_id(&self, id: ProductId) -> Result<Product, ApplicationError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| DomainError::not_found("Product", "id", id).into())
    }
}

fn persistence(error: RepositoryError) -> ApplicationError {
    ApplicationError::Persistence(error.to_string())
}
