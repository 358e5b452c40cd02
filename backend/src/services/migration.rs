//! Backfill migration service
//!
//! Converts historical stock movements into ledger entries. Runs are
//! idempotent: a movement that already has an entry is skipped, and the
//! sink's uniqueness constraint catches runs that race each other.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{FixedOffset, Offset, Utc};
use shared::builder::build_from_movement;
use shared::{
    Catalog, LedgerError, MigrationRun, MigrationScope, MovementOutcome, StockMovement,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ports::{CatalogProvider, InsertOutcome, LedgerSink, MovementProvider};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Tuning for one migration run
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Movements processed between deadline and cancellation checks
    pub batch_size: usize,
    /// Timezone used to turn movement timestamps into ledger dates
    pub reporting_offset: FixedOffset,
    pub deadline: Option<Instant>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            reporting_offset: Utc.fix(),
            deadline: None,
            cancel: None,
        }
    }
}

impl MigrationOptions {
    fn should_stop(&self) -> bool {
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        cancelled || expired
    }
}

/// Migration service over any catalog, movement source and ledger sink
pub struct MigrationService<C, M, S> {
    catalog: C,
    movements: M,
    sink: S,
    options: MigrationOptions,
}

impl<C, M, S> MigrationService<C, M, S>
where
    C: CatalogProvider,
    M: MovementProvider,
    S: LedgerSink,
{
    pub fn new(catalog: C, movements: M, sink: S) -> Self {
        Self {
            catalog,
            movements,
            sink,
            options: MigrationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the scope's movements from the provider and migrate them
    pub async fn migrate(&self, tenant_id: Uuid, scope: MigrationScope) -> AppResult<MigrationRun> {
        let movements = self
            .movements
            .load_movements(tenant_id, scope)
            .await
            .map_err(|e| unavailable("movement source", e))?;
        self.migrate_movements(tenant_id, &movements, scope).await
    }

    /// Migrate an explicit list of movements
    ///
    /// Movements outside `scope` are ignored and do not count toward `total`.
    pub async fn migrate_movements(
        &self,
        tenant_id: Uuid,
        movements: &[StockMovement],
        scope: MigrationScope,
    ) -> AppResult<MigrationRun> {
        let catalog = self
            .catalog
            .load_catalog(tenant_id)
            .await
            .map_err(|e| unavailable("catalog", e))?;
        let mut migrated = self
            .sink
            .migrated_movement_ids(tenant_id)
            .await
            .map_err(|e| unavailable("ledger sink", e))?;

        let in_scope: Vec<&StockMovement> = movements
            .iter()
            .filter(|m| m.item_ref.kind == scope.item_kind())
            .collect();

        let mut run = MigrationRun::new(scope, in_scope.len() as i64);
        let batch_size = self.options.batch_size.max(1);

        tracing::info!(
            tenant_id = %tenant_id,
            scope = scope.as_str(),
            total = run.total,
            already_migrated = migrated.len(),
            "Starting backfill migration"
        );

        let mut seen: HashSet<Uuid> = HashSet::with_capacity(in_scope.len());
        let mut batches = in_scope.chunks(batch_size).peekable();
        while let Some(batch) = batches.next() {
            for movement in batch {
                let outcome = if seen.insert(movement.id) {
                    self.migrate_one(tenant_id, movement, &catalog, &mut migrated)
                        .await
                } else {
                    tracing::debug!(movement_id = %movement.id, "Duplicate movement in input, skipping");
                    MovementOutcome::Skipped
                };
                run.record(outcome);
            }
            run.batches_completed += 1;

            if batches.peek().is_some() && self.options.should_stop() {
                run.interrupted = true;
                tracing::warn!(
                    tenant_id = %tenant_id,
                    scope = scope.as_str(),
                    processed = run.processed(),
                    total = run.total,
                    "Backfill migration interrupted at batch boundary"
                );
                break;
            }
        }

        let run = run.finish();
        tracing::info!(
            tenant_id = %tenant_id,
            scope = scope.as_str(),
            created = run.created,
            skipped = run.skipped,
            errors = run.errors,
            "Backfill migration finished: {}",
            run.message
        );
        Ok(run)
    }

    async fn migrate_one(
        &self,
        tenant_id: Uuid,
        movement: &StockMovement,
        catalog: &Catalog,
        migrated: &mut HashSet<Uuid>,
    ) -> MovementOutcome {
        if migrated.contains(&movement.id) {
            tracing::debug!(movement_id = %movement.id, "Movement already migrated, skipping");
            return MovementOutcome::Skipped;
        }

        let entry = match build_from_movement(movement, catalog, self.options.reporting_offset) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    movement_id = %movement.id,
                    item = %movement.item_ref,
                    "Could not price movement: {}",
                    e
                );
                return MovementOutcome::Errored;
            }
        };

        match self.sink.insert_entry(tenant_id, &entry).await {
            Ok(InsertOutcome::Inserted) => {
                migrated.insert(movement.id);
                tracing::debug!(
                    movement_id = %movement.id,
                    entry_id = %entry.id,
                    kind = entry.kind.as_str(),
                    "Created ledger entry from movement"
                );
                MovementOutcome::Created
            }
            Ok(InsertOutcome::AlreadyExists) => {
                migrated.insert(movement.id);
                tracing::debug!(
                    movement_id = %movement.id,
                    "Entry written by a concurrent run, skipping"
                );
                MovementOutcome::Skipped
            }
            Err(e) => {
                tracing::warn!(movement_id = %movement.id, "Failed to persist entry: {}", e);
                MovementOutcome::Errored
            }
        }
    }
}

fn unavailable(collaborator: &str, source: AppError) -> AppError {
    match source {
        AppError::Ledger(LedgerError::Unavailable(_)) => source,
        other => AppError::unavailable(collaborator, other),
    }
}
