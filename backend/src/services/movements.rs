//! Stock movement history reader

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{ItemKind, ItemRef, MigrationScope, MovementDirection, StockMovement};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ports::MovementProvider;

/// Read-only access to the `stock_movements` table
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    direction: String,
    item_kind: String,
    item_id: Uuid,
    quantity: i32,
    occurred_at: DateTime<Utc>,
    notes: Option<String>,
}

impl MovementRow {
    fn into_movement(self) -> AppResult<StockMovement> {
        let direction = match self.direction.as_str() {
            "in" => MovementDirection::In,
            "out" => MovementDirection::Out,
            other => {
                return Err(AppError::Internal(format!(
                    "movement {} has unknown direction '{}'",
                    self.id, other
                )))
            }
        };
        let kind: ItemKind = self.item_kind.parse().map_err(AppError::Internal)?;

        Ok(StockMovement {
            id: self.id,
            direction,
            item_ref: ItemRef {
                kind,
                id: self.item_id,
            },
            quantity: self.quantity,
            occurred_at: self.occurred_at,
            notes: self.notes,
        })
    }
}

impl MovementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List a tenant's movements for one item kind, oldest first
    pub async fn list(&self, tenant_id: Uuid, kind: ItemKind) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, direction, item_kind, item_id, quantity, occurred_at, notes
            FROM stock_movements
            WHERE tenant_id = $1 AND item_kind = $2
            ORDER BY occurred_at ASC, id ASC
            "#,
        )
        .bind(tenant_id)
        .bind(kind.as_str())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(MovementRow::into_movement).collect()
    }
}

#[async_trait]
impl MovementProvider for MovementService {
    async fn load_movements(
        &self,
        tenant_id: Uuid,
        scope: MigrationScope,
    ) -> AppResult<Vec<StockMovement>> {
        self.list(tenant_id, scope.item_kind()).await
    }
}
