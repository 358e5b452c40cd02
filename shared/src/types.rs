//! Common types used across the engine

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Fraction digits kept on every computed monetary or percentage figure
pub const MONEY_DP: u32 = 2;

/// Round a computed figure to money precision (half away from zero)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

fn too_large(field: &str) -> LedgerError {
    LedgerError::invalid(field, "amount too large")
}

/// `a + b`, rejected as `field` when the result leaves the decimal range
pub fn checked_add(field: &str, a: Decimal, b: Decimal) -> LedgerResult<Decimal> {
    a.checked_add(b).ok_or_else(|| too_large(field))
}

pub fn checked_sub(field: &str, a: Decimal, b: Decimal) -> LedgerResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| too_large(field))
}

pub fn checked_mul(field: &str, a: Decimal, b: Decimal) -> LedgerResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| too_large(field))
}

/// Overflow-checked sum of a sequence of amounts
pub fn checked_sum<I>(field: &str, values: I) -> LedgerResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked_add(field, acc, value))
}

/// `part / whole × 100`, or zero when `whole` is not positive
pub fn percent_of(field: &str, part: Decimal, whole: Decimal) -> LedgerResult<Decimal> {
    if whole > Decimal::ZERO {
        let ratio = part.checked_div(whole).ok_or_else(|| too_large(field))?;
        checked_mul(field, ratio, Decimal::ONE_HUNDRED)
    } else {
        Ok(Decimal::ZERO)
    }
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> LedgerResult<Self> {
        if start > end {
            return Err(LedgerError::invalid(
                "date_range",
                format!("start {} is after end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The window of identical length ending the day before `start`
    pub fn preceding(&self) -> Self {
        let span = self.end - self.start;
        Self {
            start: self.start - span - Duration::days(1),
            end: self.start - Duration::days(1),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.len_days()).map(move |offset| start + Duration::days(offset))
    }
}
