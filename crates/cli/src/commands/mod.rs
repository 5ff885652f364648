//! CLI subcommands.

pub mod check;
pub mod migrate;

use secrecy::SecretString;
use thiserror::Error;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Store(#[from] intake_server::db::StoreError),

    #[error("Missing tables: {}, run `intake-cli migrate`", .0.join(", "))]
    MissingTables(Vec<&'static str>),
}

/// Read the database URL, preferring `INTAKE_DATABASE_URL` over `DATABASE_URL`.
pub(crate) fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("INTAKE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("INTAKE_DATABASE_URL"))
}
