use std::collections::BTreeMap;

use tokio::sync::RwLock;

use catalog_core::domain::product::{NewProduct, Product, ProductId};
use catalog_core::search::{Keyword, PageRequest};

use super::{ProductRepository, RepositoryError};

#[derive(Default)]
struct ProductTable {
    rows: BTreeMap<ProductId, Product>,
    last_id: i64,
}

/// Product store backed by an ordered map; ids are never reused, like the SQL table.
#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<ProductTable>,
}

impl InMemoryProductRepository {
    async fn filtered(&self, predicate: impl Fn(&Product) -> bool) -> Vec<Product> {
        let table = self.table.read().await;
        table.rows.values().filter(|product| predicate(product)).cloned().collect()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_name_contains(
        &self,
        keyword: &Keyword,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.filtered(|product| product.matches_name(keyword)).await)
    }

    async fn find_by_any_field_contains(
        &self,
        keyword: &Keyword,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.filtered(|product| product.matches_any_field(keyword)).await)
    }

    async fn find_by_any_field_contains_page(
        &self,
        keyword: &Keyword,
        page: PageRequest,
    ) -> Result<Vec<Product>, RepositoryError> {
        let matches = self.filtered(|product| product.matches_any_field(keyword)).await;
        Ok(page.slice(&matches))
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let stored = product.with_id(ProductId(table.last_id));
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let table = self.table.read().await;
        Ok(table.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use catalog_core::domain::product::{NewProduct, ProductId};
    use catalog_core::search::{Keyword, PageRequest};

    use crate::repositories::{InMemoryProductRepository, ProductRepository};

    fn product(name: &str, description: &str, category: &str) -> NewProduct {
        NewProduct::new(name, description, Decimal::new(1000, 2), category).expect("valid product")
    }

    #[tokio::test]
    async fn in_memory_product_repo_round_trip() {
        let repo = InMemoryProductRepository::default();

        let stored = repo
            .insert(product("AirPods Pro", "Active Noise Cancellation", "Audio"))
            .await
            .expect("insert");
        let found = repo.find_by_id(stored.id).await.expect("find product");

        assert_eq!(stored.id, ProductId(1));
        assert_eq!(found, Some(stored));
    }

    #[tokio::test]
    async fn any_field_search_matches_every_field_and_nothing_else() {
        let repo = InMemoryProductRepository::default();
        repo.insert(product("Sony WH-1000XM5", "noise canceling headphones", "Audio"))
            .await
            .expect("insert");
        repo.insert(product("Dell XPS 15", "Intel Core i9", "Laptops")).await.expect("insert");
        repo.insert(product("Speaker", "Bluetooth", "AUDIO gear")).await.expect("insert");

        let keyword = Keyword::parse(Some("audio")).expect("keyword");
        let matches = repo.find_by_any_field_contains(&keyword).await.expect("search");
        let all = repo.find_all().await.expect("find all");

        for product in &all {
            assert_eq!(matches.contains(product), product.matches_any_field(&keyword));
        }
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn any_field_search_folds_accented_letters() {
        let repo = InMemoryProductRepository::default();
        repo.insert(product("Écran Über", "Café display", "Électronique")).await.expect("insert");
        repo.insert(product("Cafe Table", "oak", "Furniture")).await.expect("insert");

        for raw in ["écran", "CAFÉ", "électronique"] {
            let keyword = Keyword::parse(Some(raw)).expect("keyword");
            let matches = repo.find_by_any_field_contains(&keyword).await.expect("search");
            let names = matches.iter().map(|product| product.name.as_str()).collect::<Vec<_>>();
            assert_eq!(names, vec!["Écran Über"], "keyword `{raw}`");
        }
    }

    #[tokio::test]
    async fn paginated_search_slices_in_id_order() {
        let repo = InMemoryProductRepository::default();
        for index in 0..5 {
            repo.insert(product(&format!("Pro {index}"), "", "Misc")).await.expect("insert");
        }

        let keyword = Keyword::parse(Some("pro")).expect("keyword");
        let page = repo
            .find_by_any_field_contains_page(&keyword, PageRequest::new(1, 2).expect("page"))
            .await
            .expect("page");

        let ids = page.iter().map(|product| product.id.0).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 4]);
    }
}
