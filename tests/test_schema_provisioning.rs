mod mocks;

use fuzzy_index_server::domain::{EntryType, OwnerId, ReferenceId};
use fuzzy_index_server::error::IndexError;
use fuzzy_index_server::migration::{
    run_migrations, CompactionGuard, CompactionOutcome, GuardSettings,
};
use fuzzy_index_server::search::{IndexWriter, QueryEngine};
use fuzzy_index_server::storage::schema::{ensure_schema, LEVELED_COMPACTION};
use fuzzy_index_server::storage::{CatalogVisibility, InMemoryIndexStore, IndexStore};
use mocks::MockIndexStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

fn quick() -> GuardSettings {
    GuardSettings {
        attempts: 6,
        interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let store = InMemoryIndexStore::new();

    assert_ok!(ensure_schema(&store).await);
    assert_ok!(ensure_schema(&store).await);
    assert!(store.table_exists().await);
}

#[tokio::test]
async fn test_ensure_schema_failure_is_schema_unavailable() {
    let store = MockIndexStore::new();
    store.fail_create_table();

    let result = ensure_schema(&store).await;
    assert!(matches!(result, Err(IndexError::SchemaUnavailable(_))));
}

#[tokio::test]
async fn test_ensure_schema_without_keyspace_fails() {
    let store = InMemoryIndexStore::new().without_keyspace();
    assert_err!(ensure_schema(&store).await);
}

#[tokio::test]
async fn test_guard_gives_up_in_bounded_time_with_default_budget() {
    let store = InMemoryIndexStore::new().with_catalog_visibility(CatalogVisibility::Never);
    store.create_table().await.unwrap();

    let started = Instant::now();
    let outcome = CompactionGuard::default().run(&store).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome, CompactionOutcome::TimedOut { attempts: 6 });
    assert!(elapsed >= Duration::from_millis(2500));
    assert!(elapsed < Duration::from_secs(4));
    assert_eq!(store.catalog_lookup_count(), 6);
    assert_eq!(store.alteration_count(), 0);
}

#[tokio::test]
async fn test_failed_alteration_is_swallowed() {
    let store = MockIndexStore::new();
    store.create_table().await.unwrap();
    store.fail_set_compaction();

    let outcome = CompactionGuard::new(quick()).run(&store).await;

    assert!(matches!(outcome, CompactionOutcome::Failed { .. }));
    assert!(!outcome.is_converged());
    assert_eq!(store.get_call_count("set_compaction"), 1);
}

#[tokio::test]
async fn test_failed_catalog_lookup_is_swallowed() {
    let store = MockIndexStore::new();
    store.create_table().await.unwrap();
    store.fail_catalog();

    let outcome = CompactionGuard::new(quick()).run(&store).await;

    assert!(matches!(outcome, CompactionOutcome::Failed { .. }));
    assert_eq!(store.get_call_count("set_compaction"), 0);
}

#[tokio::test]
async fn test_run_migrations_creates_table_and_levels_compaction() {
    let store = Arc::new(
        InMemoryIndexStore::new().with_catalog_visibility(CatalogVisibility::AfterPolls(2)),
    );

    let handle = run_migrations(store.clone(), quick()).await.unwrap();
    assert!(store.table_exists().await);

    let outcome = handle.await.unwrap();
    assert!(outcome.is_converged());
    assert_eq!(store.current_compaction().await, LEVELED_COMPACTION);
}

#[tokio::test]
async fn test_run_migrations_stops_on_schema_failure() {
    let store = Arc::new(MockIndexStore::new());
    store.fail_create_table();

    let result = run_migrations(store.clone(), quick()).await;

    assert!(matches!(result, Err(IndexError::SchemaUnavailable(_))));
    assert_eq!(store.get_call_count("compaction_class"), 0);
}

#[tokio::test]
async fn test_index_usable_while_guard_is_polling() {
    let store = Arc::new(
        InMemoryIndexStore::new().with_catalog_visibility(CatalogVisibility::Never),
    );
    let handle = run_migrations(
        store.clone(),
        GuardSettings {
            attempts: 6,
            interval: Duration::from_millis(100),
        },
    )
    .await
    .unwrap();

    let owner = OwnerId::new("U1").unwrap();
    IndexWriter::new(store.clone(), 4)
        .add_entry(
            &owner,
            "Blue Widgets",
            &ReferenceId::new("W1").unwrap(),
            EntryType::Unknown,
        )
        .await
        .unwrap();
    let hits = QueryEngine::new(store.clone(), 10)
        .search(&owner, "widget")
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert!(!handle.is_finished());
    assert_eq!(
        handle.await.unwrap(),
        CompactionOutcome::TimedOut { attempts: 6 }
    );
}
