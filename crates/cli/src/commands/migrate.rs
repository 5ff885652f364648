//! Database migration command.
//!
//! Applies the migrations in `crates/server/migrations/`, embedded at build
//! time. Already-applied migrations are skipped.
//!
//! # Environment Variables
//!
//! - `INTAKE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use intake_server::db;

use super::{CommandError, database_url};

/// Run pending migrations.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&url, 1).await?;

    let migrator = sqlx::migrate!("../server/migrations");
    tracing::info!(available = migrator.iter().count(), "Running migrations...");
    migrator.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
