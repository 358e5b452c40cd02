//! Profitability reporting service

use chrono::NaiveDate;
use serde::Deserialize;
use shared::aggregation::{aggregate_with, zero_fill, AggregateOptions};
use shared::{DateRange, PeriodReport};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::LedgerService;

/// Reporting service aggregating persisted entries
#[derive(Clone)]
pub struct ReportingService {
    ledger: LedgerService,
}

/// Query parameters for a profitability report
#[derive(Debug, Clone, Deserialize)]
pub struct ProfitabilityQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub include_purchases: bool,
    /// Emit a point for every day in range, not only days with sales
    #[serde(default)]
    pub dense: bool,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self {
            ledger: LedgerService::new(db),
        }
    }

    /// Aggregate the window, loading the preceding window too for growth
    pub async fn profitability(
        &self,
        tenant_id: Uuid,
        query: ProfitabilityQuery,
    ) -> AppResult<PeriodReport> {
        let current = DateRange::new(query.from, query.to)?;
        let loaded = DateRange::new(current.preceding().start, current.end)?;
        let entries = self.ledger.list_between(tenant_id, loaded).await?;

        let mut report = aggregate_with(
            &entries,
            query.from,
            query.to,
            AggregateOptions {
                include_purchase_total: query.include_purchases,
            },
        )?;
        if query.dense {
            report.series = zero_fill(&report.series, query.from, query.to)?;
        }

        tracing::debug!(
            tenant_id = %tenant_id,
            from = %query.from,
            to = %query.to,
            days = report.series.len(),
            "Profitability report aggregated"
        );
        Ok(report)
    }
}
