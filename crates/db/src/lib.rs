pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, is_in_memory, DbPool};
pub use fixtures::{CatalogSeed, SeedProduct, SeedResult, VerificationResult, SEED_PRODUCTS};
