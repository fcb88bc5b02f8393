use async_trait::async_trait;
use thiserror::Error;

use catalog_core::domain::product::{NewProduct, Product, ProductId};
use catalog_core::search::{Keyword, PageRequest};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read access to the product table plus the insert path used for seeding.
///
/// Every list is ordered by ascending id so page slices stay stable between calls.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_name_contains(&self, keyword: &Keyword)
        -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_any_field_contains(
        &self,
        keyword: &Keyword,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_any_field_contains_page(
        &self,
        keyword: &Keyword,
        page: PageRequest,
    ) -> Result<Vec<Product>, RepositoryError>;

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}
