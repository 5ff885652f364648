//! Connectivity check command.
//!
//! Pings the database through the same store the server uses, then confirms
//! both intake tables exist.

use intake_server::db::{self, PgStore, Store};

use super::{CommandError, database_url};

const TABLES: [&str; 2] = ["customer", "customer_order"];

/// Ping the database and look for the intake tables.
///
/// Fails with `CommandError::MissingTables` when any table is absent, so the
/// process exits non-zero.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;
    let store = PgStore::new(db::create_pool(&url, 1).await?);

    store.ping().await?;
    tracing::info!("Database reachable");

    let mut missing = Vec::new();
    for table in TABLES {
        let (present,): (bool,) = sqlx::query_as(
            r"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'intake' AND table_name = $1
            )
            ",
        )
        .bind(table)
        .fetch_one(store.pool())
        .await?;

        if present {
            tracing::info!(table, "Table present");
        } else {
            missing.push(table);
        }
    }

    require_tables(missing)
}

fn require_tables(missing: Vec<&'static str>) -> Result<(), CommandError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CommandError::MissingTables(missing))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_present() {
        assert!(require_tables(Vec::new()).is_ok());
    }

    #[test]
    fn test_missing_tables_fail_the_command() {
        let err = require_tables(vec!["customer_order"]).unwrap_err();
        assert!(matches!(err, CommandError::MissingTables(ref t) if t == &["customer_order"]));
        assert_eq!(
            err.to_string(),
            "Missing tables: customer_order, run `intake-cli migrate`"
        );
    }
}
