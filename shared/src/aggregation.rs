//! Period aggregation of ledger entries into a daily profitability series
//!
//! A pure fold: the output depends only on the set of entries, never on
//! their order. Days are keyed in a `BTreeMap` so the series comes out sorted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryKind, LedgerEntry, PeriodPoint, PeriodReport, PeriodSummary};
use crate::types::{
    checked_add, checked_mul, checked_sub, checked_sum, percent_of, round_money, DateRange,
};

/// Optional extras for an aggregation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Also total the cost of purchases in range
    pub include_purchase_total: bool,
}

/// Aggregate sales between `from` and `to`, both inclusive
///
/// Entries outside the current window are ignored, except those falling in
/// the equal-length window right before `from`, which feed the growth figure.
pub fn aggregate(entries: &[LedgerEntry], from: NaiveDate, to: NaiveDate) -> LedgerResult<PeriodReport> {
    aggregate_with(entries, from, to, AggregateOptions::default())
}

pub fn aggregate_with(
    entries: &[LedgerEntry],
    from: NaiveDate,
    to: NaiveDate,
    options: AggregateOptions,
) -> LedgerResult<PeriodReport> {
    let current = DateRange::new(from, to)?;
    let previous = current.preceding();

    let mut days: BTreeMap<NaiveDate, PeriodPoint> = BTreeMap::new();
    let mut previous_profit = Decimal::ZERO;
    let mut purchase_total = Decimal::ZERO;

    for entry in entries {
        match entry.kind {
            EntryKind::Sale if current.contains(entry.date) => {
                let point = days
                    .entry(entry.date)
                    .or_insert_with(|| PeriodPoint::empty(entry.date));
                point.revenue = checked_add("revenue", point.revenue, entry.total_value)?;
                point.cost = checked_add("cost", point.cost, entry.total_cost)?;
                point.profit = checked_add("profit", point.profit, entry.net_profit)?;
                point.transaction_count += 1;
            }
            EntryKind::Sale if previous.contains(entry.date) => {
                previous_profit = checked_add("profit", previous_profit, entry.net_profit)?;
            }
            EntryKind::Purchase if current.contains(entry.date) => {
                purchase_total = checked_add("purchase_total", purchase_total, entry.total_cost)?;
            }
            _ => {}
        }
    }

    let series: Vec<PeriodPoint> = days.into_values().collect();
    let total_revenue = checked_sum("revenue", series.iter().map(|p| p.revenue))?;
    let total_cost = checked_sum("cost", series.iter().map(|p| p.cost))?;
    let total_profit = checked_sum("profit", series.iter().map(|p| p.profit))?;
    let sale_count: i64 = series.iter().map(|p| p.transaction_count).sum();
    let average_margin = percent_of("average_margin_percent", total_profit, total_revenue)?;

    let summary = PeriodSummary {
        average_ticket: average_ticket(total_revenue, sale_count),
        profit_growth_percent: growth_percent(total_profit, previous_profit)?,
        average_margin_percent: round_money(average_margin),
        accumulated_profit: total_profit,
        total_revenue,
        total_cost,
        sale_count,
        previous_profit,
        purchase_total: options.include_purchase_total.then_some(purchase_total),
    };

    Ok(PeriodReport {
        from,
        to,
        series,
        summary,
    })
}

/// Revenue per sale, zero when there were no sales
pub fn average_ticket(total_revenue: Decimal, sale_count: i64) -> Decimal {
    if sale_count > 0 {
        round_money(total_revenue / Decimal::from(sale_count))
    } else {
        Decimal::ZERO
    }
}

/// Profit change against the previous window
///
/// Defined as zero when the previous window made no profit; a loss or a
/// break-even period gives no meaningful base to compare against.
pub fn growth_percent(current_profit: Decimal, previous_profit: Decimal) -> LedgerResult<Decimal> {
    if previous_profit > Decimal::ZERO {
        let change = checked_sub("profit_growth_percent", current_profit, previous_profit)?;
        let ratio = change
            .checked_div(previous_profit)
            .ok_or_else(|| LedgerError::invalid("profit_growth_percent", "amount too large"))?;
        Ok(round_money(checked_mul("profit_growth_percent", ratio, Decimal::ONE_HUNDRED)?))
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Densify a sparse series, inserting empty points for days without sales
pub fn zero_fill(series: &[PeriodPoint], from: NaiveDate, to: NaiveDate) -> LedgerResult<Vec<PeriodPoint>> {
    let range = DateRange::new(from, to)?;
    let by_day: BTreeMap<NaiveDate, &PeriodPoint> = series.iter().map(|p| (p.date, p)).collect();
    Ok(range
        .days()
        .map(|day| {
            by_day
                .get(&day)
                .map(|p| (*p).clone())
                .unwrap_or_else(|| PeriodPoint::empty(day))
        })
        .collect())
}
