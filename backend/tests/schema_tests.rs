//! Schema tests
//!
//! Checks the ledger table can hold every figure the pricing code produces,
//! including extreme margins and large totals.

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::valuation::price;
use shared::EntryKind;

const SCHEMA: &str = include_str!("../migrations/20240601000000_profit_ledger.sql");

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Column declarations of `ledger_entries`, one trimmed line each
fn ledger_columns() -> Vec<&'static str> {
    let start = SCHEMA
        .find("CREATE TABLE IF NOT EXISTS ledger_entries")
        .expect("ledger_entries table");
    let body = &SCHEMA[start..];
    let end = body.find(");").expect("end of ledger_entries table");
    body[..end].lines().skip(1).map(str::trim).collect()
}

fn column_type(name: &str) -> String {
    let prefix = format!("{} ", name);
    let line = ledger_columns()
        .into_iter()
        .find(|line| line.starts_with(&prefix))
        .unwrap_or_else(|| panic!("column {} not declared", name));
    line[prefix.len()..]
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(',')
        .to_string()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A penny sale of a costly item has a margin far beyond six digits
    #[test]
    fn test_extreme_margin_is_storable() {
        let figures = price(EntryKind::Sale, 1, dec("1000"), dec("0.01"), &[]).unwrap();
        assert_eq!(figures.margin_percent, dec("-9999900.00"));
        assert_eq!(column_type("margin_percent"), "NUMERIC");
    }

    /// Totals can exceed any fixed precision the unit columns allow
    #[test]
    fn test_large_totals_are_storable() {
        let figures = price(
            EntryKind::Purchase,
            i32::MAX,
            dec("99999999999999.9999"),
            Decimal::ZERO,
            &[],
        )
        .unwrap();
        assert!(figures.total_value > dec("99999999999999.99"));
        for column in ["unit_cost", "unit_price", "total_value", "total_cost", "net_profit"] {
            assert_eq!(column_type(column), "NUMERIC", "{} must be unbounded", column);
        }
    }
}
