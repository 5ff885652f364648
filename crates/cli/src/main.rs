//! Order Intake CLI - Database migrations and connectivity checks.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! intake-cli migrate
//!
//! # Verify the database is reachable and the schema is in place
//! intake-cli check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "intake-cli")]
#[command(author, version, about = "Order intake CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Check database connectivity and schema
    Check,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Check => commands::check::run().await,
    }
}
