//! Backfill migration tests
//!
//! Runs the migrator over in-memory ports:
//! - idempotence across repeated runs
//! - per-movement failure isolation
//! - scope filtering and kit valuation
//! - batch-boundary interruption

mod common;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use common::{dec, fixture, movement, InMemoryCatalog, InMemoryMovements, InMemorySink};
use profit_ledger_backend::error::AppError;
use profit_ledger_backend::services::{MigrationOptions, MigrationService};
use shared::{
    EntryKind, ItemRef, LedgerError, MigrationScope, MovementDirection, StockMovement,
};

fn service(
    catalog: InMemoryCatalog,
    movements: Vec<StockMovement>,
    sink: &InMemorySink,
) -> MigrationService<InMemoryCatalog, InMemoryMovements, InMemorySink> {
    MigrationService::new(catalog, InMemoryMovements::new(movements), sink.clone())
}

#[tokio::test]
async fn test_ten_movements_three_already_migrated() {
    let f = fixture();
    let movements: Vec<StockMovement> = (0..10)
        .map(|_| movement(MovementDirection::Out, ItemRef::product(f.product_a), 1))
        .collect();
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements.clone(), &sink);

    let first = migrator
        .migrate_movements(f.tenant_id, &movements[..3], MigrationScope::Products)
        .await
        .unwrap();
    assert_eq!(first.created, 3);

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!(run.total, 10);
    assert_eq!(run.created, 7);
    assert_eq!(run.skipped, 3);
    assert_eq!(run.errors, 0);
    assert_eq!(run.message, "7 created, 3 skipped, 0 errors");
    assert!(!run.interrupted);
    assert_eq!(sink.entries().len(), 10);
}

#[tokio::test]
async fn test_second_run_creates_nothing() {
    let f = fixture();
    let movements = vec![
        movement(MovementDirection::In, ItemRef::product(f.product_a), 5),
        movement(MovementDirection::Out, ItemRef::product(f.product_b), 2),
        movement(MovementDirection::Out, ItemRef::kit(f.kit), 1),
    ];
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    let first = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!((first.total, first.created, first.skipped), (2, 2, 0));

    let second = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!(second.total, 2);
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(sink.entries().len(), 2);
}

#[tokio::test]
async fn test_migrated_set_is_per_tenant() {
    let f = fixture();
    let movements = vec![movement(MovementDirection::Out, ItemRef::product(f.product_a), 1)];
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    let other_tenant = uuid::Uuid::new_v4();
    let run = migrator.migrate(other_tenant, MigrationScope::Products).await.unwrap();
    assert_eq!(run.created, 1);
}

#[tokio::test]
async fn test_failures_do_not_abort_the_run() {
    let f = fixture();
    let unknown = uuid::Uuid::new_v4();
    let bad_quantity = movement(MovementDirection::Out, ItemRef::product(f.product_b), 0);
    let write_fails = movement(MovementDirection::Out, ItemRef::product(f.product_b), 1);
    let movements = vec![
        movement(MovementDirection::Out, ItemRef::product(f.product_a), 1),
        movement(MovementDirection::Out, ItemRef::product(unknown), 1),
        bad_quantity,
        write_fails.clone(),
        movement(MovementDirection::In, ItemRef::product(f.product_a), 3),
    ];
    let sink = InMemorySink::new();
    sink.fail_on(write_fails.id);
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!(run.total, 5);
    assert_eq!(run.created, 2);
    assert_eq!(run.errors, 3);
    assert_eq!(run.message, "2 created, 0 skipped, 3 errors");

    // Errored movements are retried by the next run
    let retry = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!((retry.created, retry.skipped, retry.errors), (0, 2, 3));
}

#[tokio::test]
async fn test_kit_with_missing_component_is_errored() {
    let mut f = fixture();
    let broken_kit = uuid::Uuid::new_v4();
    f.catalog.upsert(shared::Item::kit(
        broken_kit,
        "Kit Quebrado",
        vec![shared::KitComponent {
            item_id: uuid::Uuid::new_v4(),
            quantity: 1,
        }],
    ));
    let movements = vec![
        movement(MovementDirection::Out, ItemRef::kit(broken_kit), 1),
        movement(MovementDirection::Out, ItemRef::kit(f.kit), 1),
    ];
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    let run = migrator.migrate(f.tenant_id, MigrationScope::Kits).await.unwrap();
    assert_eq!((run.created, run.errors), (1, 1));
}

#[tokio::test]
async fn test_scope_selects_item_kind() {
    let f = fixture();
    let movements = vec![
        movement(MovementDirection::Out, ItemRef::product(f.product_a), 1),
        movement(MovementDirection::Out, ItemRef::kit(f.kit), 2),
    ];
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements.clone(), &sink);

    // Explicit lists are filtered too, not only provider results
    let run = migrator
        .migrate_movements(f.tenant_id, &movements, MigrationScope::Kits)
        .await
        .unwrap();
    assert_eq!(run.total, 1);
    assert_eq!(run.created, 1);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.item_ref, Some(ItemRef::kit(f.kit)));
    assert_eq!(entry.kind, EntryKind::Sale);
    // 2A + 1B = 2 × 10.00 + 7.50
    assert_eq!(entry.unit_cost, dec("27.50"));
    // 2 × 25.00 + 20.00
    assert_eq!(entry.unit_price, dec("70.00"));
    assert_eq!(entry.total_value, dec("140.00"));
    assert_eq!(entry.total_cost, dec("55.00"));
    assert_eq!(entry.net_profit, dec("85.00"));
}

#[tokio::test]
async fn test_direction_maps_to_entry_kind() {
    let f = fixture();
    let stock_in = movement(MovementDirection::In, ItemRef::product(f.product_a), 4);
    let stock_out = movement(MovementDirection::Out, ItemRef::product(f.product_a), 3);
    let sink = InMemorySink::new();
    let migrator = service(
        InMemoryCatalog::new(f.catalog.clone()),
        vec![stock_in.clone(), stock_out.clone()],
        &sink,
    );

    migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    let entries = sink.entries();

    let purchase = entries
        .iter()
        .find(|e| e.source_movement_id == Some(stock_in.id))
        .unwrap();
    assert_eq!(purchase.kind, EntryKind::Purchase);
    assert_eq!(purchase.total_value, dec("40.00"));
    assert_eq!(purchase.total_cost, dec("40.00"));
    assert_eq!(purchase.net_profit, dec("0"));

    let sale = entries
        .iter()
        .find(|e| e.source_movement_id == Some(stock_out.id))
        .unwrap();
    assert_eq!(sale.kind, EntryKind::Sale);
    assert_eq!(sale.total_value, dec("75.00"));
    assert_eq!(sale.total_cost, dec("30.00"));
    assert_eq!(sale.net_profit, dec("45.00"));
    assert_eq!(sale.margin_percent, dec("60.00"));
}

#[tokio::test]
async fn test_entry_date_uses_reporting_offset() {
    let f = fixture();
    let mut late_night = movement(MovementDirection::Out, ItemRef::product(f.product_a), 1);
    late_night.occurred_at = Utc.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap();
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), vec![late_night], &sink)
        .with_options(MigrationOptions {
            reporting_offset: FixedOffset::west_opt(3 * 3600).unwrap(),
            ..MigrationOptions::default()
        });

    migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!(
        sink.entries()[0].date,
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    );
}

#[tokio::test]
async fn test_concurrent_insert_counts_as_skipped() {
    let f = fixture();
    let contested = movement(MovementDirection::Out, ItemRef::product(f.product_a), 1);
    let movements = vec![
        contested.clone(),
        movement(MovementDirection::Out, ItemRef::product(f.product_b), 1),
    ];
    let sink = InMemorySink::new();
    sink.race_on(contested.id);
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!((run.created, run.skipped, run.errors), (1, 1, 0));
}

#[tokio::test]
async fn test_duplicate_movements_processed_once() {
    let f = fixture();
    let once = movement(MovementDirection::Out, ItemRef::product(f.product_a), 1);
    let movements = vec![once.clone(), once.clone(), once];
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert_eq!(run.total, 3);
    assert_eq!((run.created, run.skipped), (1, 2));
    assert_eq!(sink.entries().len(), 1);
}

#[tokio::test]
async fn test_unreachable_collaborators_fail_before_processing() {
    let f = fixture();
    let movements = vec![movement(MovementDirection::Out, ItemRef::product(f.product_a), 1)];

    let offline_movements = MigrationService::new(
        InMemoryCatalog::new(f.catalog.clone()),
        InMemoryMovements {
            movements: movements.clone(),
            unreachable: true,
        },
        InMemorySink::new(),
    );
    let err = offline_movements
        .migrate(f.tenant_id, MigrationScope::Products)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ledger(LedgerError::Unavailable(_))));

    let sink = InMemorySink::unreachable();
    let offline_sink = service(InMemoryCatalog::new(f.catalog.clone()), movements.clone(), &sink);
    let err = offline_sink
        .migrate(f.tenant_id, MigrationScope::Products)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ledger(LedgerError::Unavailable(_))));
    assert!(sink.entries().is_empty());

    let offline_catalog = service(
        InMemoryCatalog {
            catalog: f.catalog.clone(),
            unreachable: true,
        },
        movements,
        &InMemorySink::new(),
    );
    let err = offline_catalog
        .migrate(f.tenant_id, MigrationScope::Products)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ledger(LedgerError::Unavailable(_))));
}

#[tokio::test]
async fn test_cancellation_stops_at_batch_boundary() {
    let f = fixture();
    let movements: Vec<StockMovement> = (0..5)
        .map(|_| movement(MovementDirection::Out, ItemRef::product(f.product_a), 1))
        .collect();
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements.clone(), &sink)
        .with_options(MigrationOptions {
            batch_size: 2,
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..MigrationOptions::default()
        });

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert!(run.interrupted);
    assert_eq!(run.batches_completed, 1);
    assert_eq!(run.created, 2);
    assert_eq!(
        run.message,
        "2 created, 0 skipped, 0 errors (interrupted after 2 of 5 movements)"
    );

    // Nothing is rolled back; a later run picks up the rest
    let resumed = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink);
    let run = resumed.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert!(!run.interrupted);
    assert_eq!((run.created, run.skipped), (3, 2));
    assert_eq!(sink.entries().len(), 5);
}

#[tokio::test]
async fn test_expired_deadline_interrupts_after_first_batch() {
    let f = fixture();
    let movements: Vec<StockMovement> = (0..3)
        .map(|_| movement(MovementDirection::Out, ItemRef::product(f.product_a), 1))
        .collect();
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink)
        .with_options(MigrationOptions {
            batch_size: 1,
            deadline: Some(Instant::now()),
            ..MigrationOptions::default()
        });

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert!(run.interrupted);
    assert_eq!(run.processed(), 1);
}

#[tokio::test]
async fn test_run_fitting_one_batch_is_never_interrupted() {
    let f = fixture();
    let movements: Vec<StockMovement> = (0..3)
        .map(|_| movement(MovementDirection::Out, ItemRef::product(f.product_a), 1))
        .collect();
    let sink = InMemorySink::new();
    let migrator = service(InMemoryCatalog::new(f.catalog.clone()), movements, &sink)
        .with_options(MigrationOptions {
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..MigrationOptions::default()
        });

    let run = migrator.migrate(f.tenant_id, MigrationScope::Products).await.unwrap();
    assert!(!run.interrupted);
    assert_eq!(run.created, 3);
}
