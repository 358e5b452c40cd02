//! HTTP handler for the backfill migration endpoint

use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{MigrationRun, MigrationScope};

use crate::error::{AppError, AppResult};
use crate::middleware::Tenant;
use crate::services::{
    CatalogService, LedgerService, MigrationOptions, MigrationService, MovementService,
};
use crate::AppState;

/// Backfill ledger entries from stock movements (`products` or `kits`)
pub async fn run_migration(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(scope): Path<String>,
) -> AppResult<Json<MigrationRun>> {
    let scope: MigrationScope = scope.parse().map_err(|message: String| AppError::Validation {
        field: "scope".to_string(),
        message,
    })?;

    let reporting_offset = state
        .config
        .reporting
        .offset()
        .map_err(AppError::Configuration)?;
    let options = MigrationOptions {
        batch_size: state.config.migration.batch_size,
        reporting_offset,
        deadline: state
            .config
            .migration
            .time_budget()
            .map(|budget| Instant::now() + budget),
        cancel: None,
    };

    let service = MigrationService::new(
        CatalogService::new(state.db.clone()),
        MovementService::new(state.db.clone()),
        LedgerService::new(state.db),
    )
    .with_options(options);

    let run = service.migrate(tenant_id, scope).await?;
    Ok(Json(run))
}
