use crate::commands::{with_migrated_database, CommandResult, StepFailure};
use catalog_db::migrations::MIGRATOR;
use catalog_db::repositories::{ProductRepository, RepositoryError, SqlProductRepository};

pub fn run() -> CommandResult {
    let result = with_migrated_database("migrate", |pool| async move {
        SqlProductRepository::new(pool).count().await.map_err(schema_check_failure)
    });

    match result {
        Ok(products) => CommandResult::success(
            "migrate",
            format!(
                "applied pending migrations ({} known); product table holds {products} rows",
                MIGRATOR.iter().count()
            ),
        ),
        Err(failure) => failure,
    }
}

/// An unreadable product table after migrating is a migration failure (exit 5).
fn schema_check_failure(error: RepositoryError) -> StepFailure {
    ("schema_check", error.to_string(), 5)
}
