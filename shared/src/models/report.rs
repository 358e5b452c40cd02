//! Profitability report models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales totals for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub transaction_count: i64,
}

impl PeriodPoint {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            profit: Decimal::ZERO,
            transaction_count: 0,
        }
    }
}

/// Headline KPIs for a reporting window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodSummary {
    pub average_ticket: Decimal,
    pub profit_growth_percent: Decimal,
    pub average_margin_percent: Decimal,
    pub accumulated_profit: Decimal,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub sale_count: i64,
    /// Profit over the equal-length window preceding `from`
    pub previous_profit: Decimal,
    /// Cost of purchases in range, only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_total: Option<Decimal>,
}

/// Output of the period aggregator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Sparse: only days with at least one sale, ascending
    pub series: Vec<PeriodPoint>,
    pub summary: PeriodSummary,
}
