//! HTTP handlers for ledger entry endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{LedgerDraft, LedgerEntry, LedgerPatch};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::Tenant;
use crate::services::ledger::{EntryFilter, LedgerService};
use crate::AppState;

/// Price a draft without saving it
pub async fn preview_entry(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(draft): Json<LedgerDraft>,
) -> AppResult<Json<LedgerEntry>> {
    let service = LedgerService::new(state.db);
    let entry = service.preview(tenant_id, draft).await?;
    Ok(Json(entry))
}

/// Create a ledger entry
pub async fn create_entry(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Json(draft): Json<LedgerDraft>,
) -> AppResult<(StatusCode, Json<LedgerEntry>)> {
    let service = LedgerService::new(state.db);
    let entry = service.create(tenant_id, draft).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// List ledger entries
pub async fn list_entries(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Query(filter): Query<EntryFilter>,
) -> AppResult<Json<Vec<LedgerEntry>>> {
    let service = LedgerService::new(state.db);
    let entries = service.list(tenant_id, filter).await?;
    Ok(Json(entries))
}

/// Get a ledger entry
pub async fn get_entry(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(entry_id): Path<Uuid>,
) -> AppResult<Json<LedgerEntry>> {
    let service = LedgerService::new(state.db);
    let entry = service.get(tenant_id, entry_id).await?;
    Ok(Json(entry))
}

/// Edit a ledger entry; computed fields are re-derived
pub async fn update_entry(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(entry_id): Path<Uuid>,
    Json(patch): Json<LedgerPatch>,
) -> AppResult<Json<LedgerEntry>> {
    let service = LedgerService::new(state.db);
    let entry = service.update(tenant_id, entry_id, patch).await?;
    Ok(Json(entry))
}

/// Delete a ledger entry
pub async fn delete_entry(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Path(entry_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = LedgerService::new(state.db);
    service.delete(tenant_id, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
