//! `PgStore` and the reconciler against a real database.
//!
//! These tests require `INTAKE_DATABASE_URL` (or `DATABASE_URL`) pointing at
//! a `PostgreSQL` instance the tests may migrate and write to.
//!
//! Run with: `cargo test -p intake-integration-tests -- --ignored`

use std::sync::Arc;

use intake_core::{EmptyKeyPolicy, PhoneId, ReconcileMode};
use intake_integration_tests::unique_phone_id;
use intake_server::db::{self, CustomerStore, Lookup, PgStore, StoreError};
use intake_server::models::CustomerFields;
use intake_server::services::{ReconcileError, Reconciler};
use secrecy::SecretString;

async fn store() -> PgStore {
    let url = std::env::var("INTAKE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("INTAKE_DATABASE_URL must be set");
    let pool = db::create_pool(&SecretString::from(url), 4)
        .await
        .expect("Failed to connect");
    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate");
    PgStore::new(pool)
}

fn fields(fullname: &str) -> CustomerFields {
    CustomerFields {
        fullname: fullname.to_string(),
        address: "Calle 1".to_string(),
        phone: "111".to_string(),
    }
}

fn fresh_key() -> PhoneId {
    PhoneId::parse(&unique_phone_id()).expect("valid phone_id")
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_upsert_reports_created_then_updated() {
    let store = store().await;
    let key = fresh_key();

    let first = store.upsert(&key, &fields("Ana")).await.expect("upsert");
    let second = store.upsert(&key, &fields("Eva")).await.expect("upsert");

    assert!(first.inserted);
    assert!(!second.inserted);
    assert_eq!(first.customer.id, second.customer.id);
    assert_eq!(second.customer.fullname, "Eva");
    assert_eq!(second.customer.created_at, first.customer.created_at);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_lookup_and_unique_constraint() {
    let store = store().await;
    let key = fresh_key();

    assert_eq!(
        store.find_by_phone_id(&key).await.expect("lookup"),
        Lookup::NotFound
    );

    let created = store.insert(Some(&key), &fields("Ana")).await.expect("insert");
    let found = store
        .find_by_phone_id(&key)
        .await
        .expect("lookup")
        .found()
        .expect("customer present");
    assert_eq!(found.id, created.id);

    let err = store
        .insert(Some(&key), &fields("Eva"))
        .await
        .expect_err("duplicate key must be rejected");
    assert!(matches!(err, StoreError::Conflict(_)));

    let missing = store
        .update_fields(&fresh_key(), &fields("Zoe"))
        .await
        .expect_err("unknown key");
    assert!(matches!(missing, StoreError::NotFound));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_concurrent_first_submissions_both_modes() {
    let store = Arc::new(store().await);

    for mode in [ReconcileMode::Atomic, ReconcileMode::ReadThenWrite] {
        let reconciler = Reconciler::new(mode, EmptyKeyPolicy::Reject);
        let key = fresh_key();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let key = key.clone();
                tokio::spawn(async move {
                    reconciler
                        .reconcile(store.as_ref(), Some(&key), &fields(&format!("Client {i}")))
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            match task.await.expect("task panicked") {
                Ok(outcome) => ids.push(outcome.id),
                // Only a read-then-write loser may fail, and only as a conflict.
                Err(ReconcileError::Store(StoreError::Conflict(_))) => {
                    assert_eq!(mode, ReconcileMode::ReadThenWrite);
                }
                Err(e) => panic!("unexpected error in {mode}: {e}"),
            }
        }

        assert!(!ids.is_empty());
        assert!(ids.iter().all(|id| *id == ids[0]), "{mode}: {ids:?}");
    }
}
