use std::sync::Arc;

use axum::Router;
use catalog_core::config::AppConfig;
use catalog_db::repositories::{RepositoryError, SqlProductRepository};
use catalog_db::{connect_with_settings, migrations, CatalogSeed, DbPool};
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::search::ProductSearchService;
use crate::{health, products};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub search_service: ProductSearchService,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seeding failed: {0}")]
    Seed(#[source] RepositoryError),
}

/// Build the store, the search service on top of it, and keep both for the router.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    if config.catalog.seed_on_startup {
        CatalogSeed::load(&db_pool).await.map_err(BootstrapError::Seed)?;
    }

    let repository = SqlProductRepository::new(db_pool.clone());
    let search_service = ProductSearchService::new(Arc::new(repository));

    Ok(Application { config, db_pool, search_service })
}

impl Application {
    pub fn router(&self) -> Router {
        let mut router = products::router(self.search_service.clone())
            .merge(health::router(self.db_pool.clone()));

        if let Some(static_dir) = &self.config.server.static_dir {
            info!(
                event_name = "system.bootstrap.static_assets",
                correlation_id = "bootstrap",
                static_dir = %static_dir.display(),
                "serving static assets"
            );
            router = router.fallback_service(ServeDir::new(static_dir));
        }

        router.layer(TraceLayer::new_for_http())
    }
}
