//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use shared::PeriodReport;

use crate::error::AppResult;
use crate::middleware::Tenant;
use crate::services::reporting::{ProfitabilityQuery, ReportingService};
use crate::AppState;

/// Daily profitability series and KPIs for a date range
pub async fn get_profitability(
    State(state): State<AppState>,
    Tenant(tenant_id): Tenant,
    Query(query): Query<ProfitabilityQuery>,
) -> AppResult<Json<PeriodReport>> {
    let service = ReportingService::new(state.db);
    let report = service.profitability(tenant_id, query).await?;
    Ok(Json(report))
}
