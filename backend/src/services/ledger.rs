//! Ledger service for persisting and editing ledger entries

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::builder::{build, describe_ref, recompute};
use shared::{DateRange, EntryKind, ExtraCost, ItemRef, LedgerDraft, LedgerEntry, LedgerPatch};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use crate::services::ports::{InsertOutcome, LedgerSink};

/// Ledger service for one database
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
    catalog: CatalogService,
}

/// Optional date filter for listing entries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
struct LedgerRow {
    id: Uuid,
    kind: String,
    entry_date: NaiveDate,
    item_kind: Option<String>,
    item_id: Option<Uuid>,
    quantity: i32,
    unit_cost: Decimal,
    unit_price: Decimal,
    extra_costs: Json<Vec<ExtraCost>>,
    total_value: Decimal,
    total_cost: Decimal,
    net_profit: Decimal,
    margin_percent: Decimal,
    description: String,
    source_movement_id: Option<Uuid>,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = AppError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        let kind: EntryKind = row.kind.parse().map_err(AppError::Internal)?;
        let item_ref = match (row.item_kind, row.item_id) {
            (Some(item_kind), Some(id)) => Some(ItemRef {
                kind: item_kind.parse().map_err(AppError::Internal)?,
                id,
            }),
            _ => None,
        };

        Ok(LedgerEntry {
            id: row.id,
            kind,
            date: row.entry_date,
            item_ref,
            quantity: row.quantity,
            unit_cost: row.unit_cost,
            unit_price: row.unit_price,
            extra_costs: row.extra_costs.0,
            total_value: row.total_value,
            total_cost: row.total_cost,
            net_profit: row.net_profit,
            margin_percent: row.margin_percent,
            description: row.description,
            source_movement_id: row.source_movement_id,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, kind, entry_date, item_kind, item_id, quantity, unit_cost, unit_price,
           extra_costs, total_value, total_cost, net_profit, margin_percent,
           description, source_movement_id
    FROM ledger_entries
"#;

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        let catalog = CatalogService::new(db.clone());
        Self { db, catalog }
    }

    /// Build an entry from a draft without persisting it
    pub async fn preview(&self, tenant_id: Uuid, draft: LedgerDraft) -> AppResult<LedgerEntry> {
        let catalog = self.catalog.load(tenant_id).await?;
        Ok(build(draft, &catalog)?)
    }

    /// Build and persist a new entry
    pub async fn create(&self, tenant_id: Uuid, draft: LedgerDraft) -> AppResult<LedgerEntry> {
        let catalog = self.catalog.load(tenant_id).await?;
        let entry = build(draft, &catalog)?;
        self.insert(tenant_id, &entry).await?;

        tracing::info!(
            tenant_id = %tenant_id,
            entry_id = %entry.id,
            kind = entry.kind.as_str(),
            item = %describe_ref(entry.item_ref.as_ref()),
            net_profit = %entry.net_profit,
            "Ledger entry created"
        );
        Ok(entry)
    }

    /// Get one entry
    pub async fn get(&self, tenant_id: Uuid, id: Uuid) -> AppResult<LedgerEntry> {
        let row = sqlx::query_as::<_, LedgerRow>(&format!(
            "{} WHERE tenant_id = $1 AND id = $2",
            SELECT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ledger entry".to_string()))?;

        row.try_into()
    }

    /// List entries, newest first, optionally bounded by date
    pub async fn list(&self, tenant_id: Uuid, filter: EntryFilter) -> AppResult<Vec<LedgerEntry>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            DateRange::new(from, to)?;
        }

        let rows = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"{}
            WHERE tenant_id = $1
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            ORDER BY entry_date DESC, created_at DESC
            "#,
            SELECT_COLUMNS
        ))
        .bind(tenant_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }

    /// Entries dated within `range`, both ends inclusive
    pub async fn list_between(&self, tenant_id: Uuid, range: DateRange) -> AppResult<Vec<LedgerEntry>> {
        self.list(
            tenant_id,
            EntryFilter {
                from: Some(range.start),
                to: Some(range.end),
            },
        )
        .await
    }

    /// Apply a patch and persist the recomputed entry
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        patch: LedgerPatch,
    ) -> AppResult<LedgerEntry> {
        let existing = self.get(tenant_id, id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let catalog = self.catalog.load(tenant_id).await?;
        let entry = recompute(&existing, patch, &catalog)?;
        let (item_kind, item_id) = split_ref(entry.item_ref.as_ref());

        sqlx::query(
            r#"
            UPDATE ledger_entries
            SET kind = $3, entry_date = $4, item_kind = $5, item_id = $6, quantity = $7,
                unit_cost = $8, unit_price = $9, extra_costs = $10, total_value = $11,
                total_cost = $12, net_profit = $13, margin_percent = $14, description = $15,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(entry.kind.as_str())
        .bind(entry.date)
        .bind(item_kind)
        .bind(item_id)
        .bind(entry.quantity)
        .bind(entry.unit_cost)
        .bind(entry.unit_price)
        .bind(Json(&entry.extra_costs))
        .bind(entry.total_value)
        .bind(entry.total_cost)
        .bind(entry.net_profit)
        .bind(entry.margin_percent)
        .bind(&entry.description)
        .execute(&self.db)
        .await?;

        tracing::info!(tenant_id = %tenant_id, entry_id = %id, "Ledger entry recomputed");
        Ok(entry)
    }

    /// Delete an entry
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ledger_entries WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ledger entry".to_string()));
        }
        tracing::info!(tenant_id = %tenant_id, entry_id = %id, "Ledger entry deleted");
        Ok(())
    }

    /// Insert an entry; returns false when its source movement already has one
    async fn insert(&self, tenant_id: Uuid, entry: &LedgerEntry) -> AppResult<bool> {
        let (item_kind, item_id) = split_ref(entry.item_ref.as_ref());

        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO ledger_entries (
                id, tenant_id, kind, entry_date, item_kind, item_id, quantity,
                unit_cost, unit_price, extra_costs, total_value, total_cost,
                net_profit, margin_percent, description, source_movement_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT ON CONSTRAINT uq_ledger_entries_source_movement DO NOTHING
            RETURNING id
            "#,
        )
        .bind(entry.id)
        .bind(tenant_id)
        .bind(entry.kind.as_str())
        .bind(entry.date)
        .bind(item_kind)
        .bind(item_id)
        .bind(entry.quantity)
        .bind(entry.unit_cost)
        .bind(entry.unit_price)
        .bind(Json(&entry.extra_costs))
        .bind(entry.total_value)
        .bind(entry.total_cost)
        .bind(entry.net_profit)
        .bind(entry.margin_percent)
        .bind(&entry.description)
        .bind(entry.source_movement_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(inserted.is_some())
    }
}

fn split_ref(item_ref: Option<&ItemRef>) -> (Option<&'static str>, Option<Uuid>) {
    match item_ref {
        Some(r) => (Some(r.kind.as_str()), Some(r.id)),
        None => (None, None),
    }
}

#[async_trait]
impl LedgerSink for LedgerService {
    async fn migrated_movement_ids(&self, tenant_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT source_movement_id
            FROM ledger_entries
            WHERE tenant_id = $1 AND source_movement_id IS NOT NULL
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn insert_entry(&self, tenant_id: Uuid, entry: &LedgerEntry) -> AppResult<InsertOutcome> {
        if self.insert(tenant_id, entry).await? {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }
}
