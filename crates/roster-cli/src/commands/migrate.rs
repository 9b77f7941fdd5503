//! Database migration command.

use roster_core::config::{AppConfig, DatabaseBackend};
use roster_core::error::AppError;
use roster_database::DatabasePool;
use roster_database::migration::run_migrations;

use crate::output;

/// Apply every pending migration to the configured PostgreSQL database.
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    if config.database.backend == DatabaseBackend::Memory {
        output::print_warning("The in-memory backend has no schema; nothing to migrate.");
        return Ok(());
    }

    println!("Running database migrations...");
    let pool = DatabasePool::connect(&config.database).await?;
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
