//! In-memory port fakes and fixtures shared by the backend integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use profit_ledger_backend::error::{AppError, AppResult};
use profit_ledger_backend::services::{
    CatalogProvider, InsertOutcome, LedgerSink, MovementProvider,
};
use rust_decimal::Decimal;
use shared::{
    Catalog, Item, ItemRef, KitComponent, LedgerEntry, MigrationScope, MovementDirection,
    StockMovement,
};
use uuid::Uuid;

// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub struct Fixture {
    pub tenant_id: Uuid,
    pub product_a: Uuid,
    pub product_b: Uuid,
    pub kit: Uuid,
    pub catalog: Catalog,
}

/// Two products (A: 10.00/25.00, B: 7.50/20.00) and a kit of 2A + 1B
pub fn fixture() -> Fixture {
    let product_a = Uuid::new_v4();
    let product_b = Uuid::new_v4();
    let kit = Uuid::new_v4();
    let catalog = Catalog::from_items([
        Item::product(product_a, "Caneca", dec("10.00"), dec("25.00")),
        Item::product(product_b, "Camiseta", dec("7.50"), dec("20.00")),
        Item::kit(
            kit,
            "Kit Presente",
            vec![
                KitComponent {
                    item_id: product_a,
                    quantity: 2,
                },
                KitComponent {
                    item_id: product_b,
                    quantity: 1,
                },
            ],
        ),
    ]);
    Fixture {
        tenant_id: Uuid::new_v4(),
        product_a,
        product_b,
        kit,
        catalog,
    }
}

pub fn movement(direction: MovementDirection, item_ref: ItemRef, quantity: i32) -> StockMovement {
    StockMovement {
        id: Uuid::new_v4(),
        direction,
        item_ref,
        quantity,
        occurred_at: Utc.with_ymd_and_hms(2024, 3, 10, 14, 30, 0).unwrap(),
        notes: None,
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    pub catalog: Catalog,
    pub unreachable: bool,
}

impl InMemoryCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            unreachable: false,
        }
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn load_catalog(&self, _tenant_id: Uuid) -> AppResult<Catalog> {
        if self.unreachable {
            return Err(AppError::Internal("catalog offline".to_string()));
        }
        Ok(self.catalog.clone())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryMovements {
    pub movements: Vec<StockMovement>,
    pub unreachable: bool,
}

impl InMemoryMovements {
    pub fn new(movements: Vec<StockMovement>) -> Self {
        Self {
            movements,
            unreachable: false,
        }
    }
}

#[async_trait]
impl MovementProvider for InMemoryMovements {
    async fn load_movements(
        &self,
        _tenant_id: Uuid,
        scope: MigrationScope,
    ) -> AppResult<Vec<StockMovement>> {
        if self.unreachable {
            return Err(AppError::Internal("movement store offline".to_string()));
        }
        Ok(self
            .movements
            .iter()
            .filter(|m| m.item_ref.kind == scope.item_kind())
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct SinkState {
    entries: Vec<(Uuid, LedgerEntry)>,
    /// Movement ids whose entry was written by someone else after the run
    /// read the migrated set
    raced: HashSet<Uuid>,
    failing: HashSet<Uuid>,
}

/// Ledger sink enforcing one entry per (tenant, source movement)
#[derive(Clone, Default)]
pub struct InMemorySink {
    state: Arc<Mutex<SinkState>>,
    pub unreachable: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn seed(&self, tenant_id: Uuid, entry: LedgerEntry) {
        self.state.lock().unwrap().entries.push((tenant_id, entry));
    }

    /// Simulate a concurrent run winning the insert for this movement
    pub fn race_on(&self, movement_id: Uuid) {
        self.state.lock().unwrap().raced.insert(movement_id);
    }

    /// Make inserts for this movement fail
    pub fn fail_on(&self, movement_id: Uuid) {
        self.state.lock().unwrap().failing.insert(movement_id);
    }
}

#[async_trait]
impl LedgerSink for InMemorySink {
    async fn migrated_movement_ids(&self, tenant_id: Uuid) -> AppResult<HashSet<Uuid>> {
        if self.unreachable {
            return Err(AppError::Internal("ledger offline".to_string()));
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|(t, _)| *t == tenant_id)
            .filter_map(|(_, e)| e.source_movement_id)
            .collect())
    }

    async fn insert_entry(&self, tenant_id: Uuid, entry: &LedgerEntry) -> AppResult<InsertOutcome> {
        let mut state = self.state.lock().unwrap();
        if let Some(source) = entry.source_movement_id {
            if state.failing.contains(&source) {
                return Err(AppError::Internal("write rejected".to_string()));
            }
            if state.raced.contains(&source) {
                return Ok(InsertOutcome::AlreadyExists);
            }
            let exists = state
                .entries
                .iter()
                .any(|(t, e)| *t == tenant_id && e.source_movement_id == Some(source));
            if exists {
                return Ok(InsertOutcome::AlreadyExists);
            }
        }
        state.entries.push((tenant_id, entry.clone()));
        Ok(InsertOutcome::Inserted)
    }
}
