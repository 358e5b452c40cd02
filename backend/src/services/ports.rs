//! Collaborator ports consumed by the backfill migrator
//!
//! Each port takes the tenant explicitly. The Postgres services implement them
//! for the server; tests swap in in-memory fakes.

use std::collections::HashSet;

use async_trait::async_trait;
use shared::{Catalog, LedgerEntry, MigrationScope, StockMovement};
use uuid::Uuid;

use crate::error::AppResult;

/// Result of handing an entry to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The sink already holds an entry for this source movement
    AlreadyExists,
}

/// Source of catalog snapshots
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn load_catalog(&self, tenant_id: Uuid) -> AppResult<Catalog>;
}

/// Source of historical stock movements
#[async_trait]
pub trait MovementProvider: Send + Sync {
    /// Movements for the scope, oldest first
    async fn load_movements(
        &self,
        tenant_id: Uuid,
        scope: MigrationScope,
    ) -> AppResult<Vec<StockMovement>>;
}

/// Destination for migrated ledger entries
#[async_trait]
pub trait LedgerSink: Send + Sync {
    /// Ids of movements that already have an entry
    async fn migrated_movement_ids(&self, tenant_id: Uuid) -> AppResult<HashSet<Uuid>>;

    async fn insert_entry(&self, tenant_id: Uuid, entry: &LedgerEntry) -> AppResult<InsertOutcome>;
}
