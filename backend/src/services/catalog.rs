//! Catalog service reading products and kits from Postgres

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{Catalog, Item, KitComponent};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ports::CatalogProvider;

/// Catalog service producing per-tenant snapshots
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    unit_cost: Decimal,
    unit_price: Decimal,
}

#[derive(Debug, FromRow)]
struct KitRow {
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct ComponentRow {
    kit_id: Uuid,
    product_id: Uuid,
    quantity: i32,
}

impl CatalogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Load every product and kit for a tenant
    ///
    /// Component rows keep their stored order so a kit's bill of materials
    /// reads the same way it was entered.
    pub async fn load(&self, tenant_id: Uuid) -> AppResult<Catalog> {
        let products = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, unit_cost, unit_price
            FROM products
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        let kits = sqlx::query_as::<_, KitRow>(
            r#"
            SELECT id, name
            FROM kits
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        let components = sqlx::query_as::<_, ComponentRow>(
            r#"
            SELECT kc.kit_id, kc.product_id, kc.quantity
            FROM kit_components kc
            JOIN kits k ON k.id = kc.kit_id
            WHERE k.tenant_id = $1
            ORDER BY kc.kit_id, kc.position
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.db)
        .await?;

        let mut catalog = Catalog::from_items(
            products
                .into_iter()
                .map(|p| Item::product(p.id, p.name, p.unit_cost, p.unit_price)),
        );
        for kit in kits {
            let bill = components
                .iter()
                .filter(|c| c.kit_id == kit.id)
                .map(|c| KitComponent {
                    item_id: c.product_id,
                    quantity: c.quantity,
                })
                .collect();
            catalog.upsert(Item::kit(kit.id, kit.name, bill));
        }

        tracing::debug!(tenant_id = %tenant_id, items = catalog.len(), "Loaded catalog snapshot");
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogProvider for CatalogService {
    async fn load_catalog(&self, tenant_id: Uuid) -> AppResult<Catalog> {
        self.load(tenant_id).await
    }
}
