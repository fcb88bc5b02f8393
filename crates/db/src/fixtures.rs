use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::info;

use catalog_core::domain::product::NewProduct;

use crate::connection::DbPool;
use crate::repositories::product::insert_with;
use crate::repositories::RepositoryError;

/// One row of the demo catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub category: &'static str,
}

impl SeedProduct {
    pub fn to_new_product(&self) -> Result<NewProduct, RepositoryError> {
        let price = Decimal::from_str(self.price).map_err(|error| {
            RepositoryError::Decode(format!("invalid seed price for `{}`: {error}", self.name))
        })?;
        NewProduct::new(self.name, self.description, price, self.category)
            .map_err(|error| RepositoryError::Decode(error.to_string()))
    }
}

/// Canonical catalog loaded into an empty store at startup.
pub const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "MacBook Pro 16-inch",
        description: "Apple M2 Pro chip with 12-core CPU and 19-core GPU",
        price: "2499.99",
        category: "Laptops",
    },
    SeedProduct {
        name: "iPhone 15 Pro",
        description: "6.1-inch Super Retina XDR display with ProMotion",
        price: "999.99",
        category: "Smartphones",
    },
    SeedProduct {
        name: "iPad Air",
        description: "10.9-inch Liquid Retina display with True Tone",
        price: "599.99",
        category: "Tablets",
    },
    SeedProduct {
        name: "AirPods Pro",
        description: "Active Noise Cancellation for immersive sound",
        price: "249.99",
        category: "Audio",
    },
    SeedProduct {
        name: "Apple Watch Series 9",
        description: "Always-On Retina display with health monitoring",
        price: "399.99",
        category: "Wearables",
    },
    SeedProduct {
        name: "Samsung Galaxy S23",
        description: "6.1-inch Dynamic AMOLED 2X display",
        price: "799.99",
        category: "Smartphones",
    },
    SeedProduct {
        name: "Dell XPS 15",
        description: "15.6-inch 4K UHD display with Intel Core i9",
        price: "1899.99",
        category: "Laptops",
    },
    SeedProduct {
        name: "Sony WH-1000XM5",
        description: "Industry-leading noise canceling wireless headphones",
        price: "349.99",
        category: "Audio",
    },
    SeedProduct {
        name: "Microsoft Surface Pro 9",
        description: "13-inch touchscreen 2-in-1 laptop",
        price: "999.99",
        category: "Tablets",
    },
    SeedProduct {
        name: "Google Pixel 7",
        description: "6.3-inch display with Google Tensor G2",
        price: "599.99",
        category: "Smartphones",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl VerificationResult {
    pub fn missing(&self) -> Vec<&'static str> {
        self.checks.iter().filter_map(|(name, present)| (!present).then_some(*name)).collect()
    }
}

/// Demo catalog loader and verification contract.
pub struct CatalogSeed;

impl CatalogSeed {
    /// Insert the seed products in one transaction. A table that already holds
    /// products is left untouched.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let products =
            SEED_PRODUCTS.iter().map(SeedProduct::to_new_product).collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.rollback().await?;
            info!(
                event_name = "catalog.seed.skipped",
                correlation_id = "bootstrap",
                existing_products = existing,
                "product table already populated, skipping seed"
            );
            return Ok(SeedResult { inserted: 0, skipped: true });
        }

        for product in &products {
            insert_with(&mut *tx, product).await?;
        }
        tx.commit().await?;

        info!(
            event_name = "catalog.seed.loaded",
            correlation_id = "bootstrap",
            inserted = products.len(),
            "seed catalog loaded"
        );
        Ok(SeedResult { inserted: products.len(), skipped: false })
    }

    /// Check that every seed product is present by name.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SEED_PRODUCTS.len());

        for product in SEED_PRODUCTS {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE name = ?")
                .bind(product.name)
                .fetch_one(pool)
                .await?;
            checks.push((product.name, count > 0));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}
