use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{Row, Sqlite};

use catalog_core::domain::product::{NewProduct, Product, ProductId};
use catalog_core::search::{fold_case, Keyword, PageRequest};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const SELECT_PRODUCT: &str = "SELECT id, name, description, price, category FROM product";

const ANY_FIELD_PREDICATE: &str = "instr(name_folded, ?) > 0
        OR instr(description_folded, ?) > 0
        OR instr(category_folded, ?) > 0";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(&price_str).map_err(|error| {
        RepositoryError::Decode(format!("invalid decimal value for product {id} price: {error}"))
    })?;

    Ok(Product { id: ProductId(id), name, description, price, category })
}

fn rows_to_products(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Product>, RepositoryError> {
    rows.iter().map(row_to_product).collect()
}

/// Inserts one product through any executor so seeding can share a transaction.
pub(crate) async fn insert_with<'e, E>(
    executor: E,
    product: &NewProduct,
) -> Result<ProductId, RepositoryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO product (
            name, description, price, category,
            name_folded, description_folded, category_folded
        ) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.to_string())
    .bind(&product.category)
    .bind(fold_case(&product.name))
    .bind(fold_case(&product.description))
    .bind(fold_case(&product.category))
    .execute(executor)
    .await?;

    Ok(ProductId(result.last_insert_rowid()))
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_product(r)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_PRODUCT} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        rows_to_products(&rows)
    }

    async fn find_by_name_contains(
        &self,
        keyword: &Keyword,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows =
            sqlx::query(&format!("{SELECT_PRODUCT} WHERE instr(name_folded, ?) > 0 ORDER BY id"))
                .bind(keyword.folded())
                .fetch_all(&self.pool)
        .await?;

        rows_to_products(&rows)
    }

    async fn find_by_any_field_contains(
        &self,
        keyword: &Keyword,
    ) -> Result<Vec<Product>, RepositoryError> {
        let folded = keyword.folded();
        let rows = sqlx::query(&format!("{SELECT_PRODUCT} WHERE {ANY_FIELD_PREDICATE} ORDER BY id"))
            .bind(&folded)
            .bind(&folded)
            .bind(&folded)
            .fetch_all(&self.pool)
            .await?;

        rows_to_products(&rows)
    }

    async fn find_by_any_field_contains_page(
        &self,
        keyword: &Keyword,
        page: PageRequest,
    ) -> Result<Vec<Product>, RepositoryError> {
        let folded = keyword.folded();
        let rows = sqlx::query(&format!(
            "{SELECT_PRODUCT} WHERE {ANY_FIELD_PREDICATE} ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(&folded)
        .bind(&folded)
        .bind(&folded)
        .bind(page.size())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows_to_products(&rows)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let id = insert_with(&self.pool, &product).await?;
        Ok(product.with_id(id))
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product").fetch_one(&self.pool).await?;
        Ok(count)
    }
}
