//! Valuation: unit cost resolution and transaction line pricing
//!
//! Kit costs are rolled up from the catalog on every call, so a change to a
//! component's cost shows up on the next resolution without a recompute step.
//! Kit components must be products; a kit nested in a kit is rejected.

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Catalog, EntryKind, ExtraCost, Item, ItemDetails, ItemRef, LineFigures};
use crate::types::{
    checked_add, checked_mul, checked_sub, checked_sum, percent_of, round_money,
};
use crate::validation::{
    validate_extra_costs, validate_kit_component, validate_non_negative, validate_quantity,
};

/// Effective unit cost of an item
pub fn resolve_unit_cost(item: &Item, catalog: &Catalog) -> LedgerResult<Decimal> {
    match &item.details {
        ItemDetails::Product { unit_cost, .. } => Ok(*unit_cost),
        ItemDetails::Kit { .. } => rollup(item, catalog, |unit_cost, _| unit_cost),
    }
}

/// Catalog sale price of an item; a kit sells at the sum of its components' prices
pub fn resolve_unit_price(item: &Item, catalog: &Catalog) -> LedgerResult<Decimal> {
    match &item.details {
        ItemDetails::Product { unit_price, .. } => Ok(*unit_price),
        ItemDetails::Kit { .. } => rollup(item, catalog, |_, unit_price| unit_price),
    }
}

/// Look up a tagged reference, checking the catalog agrees on its kind
pub fn resolve_item<'a>(item_ref: &ItemRef, catalog: &'a Catalog) -> LedgerResult<&'a Item> {
    let item = catalog
        .get(&item_ref.id)
        .ok_or_else(|| LedgerError::Unresolvable(format!("{} not found in catalog", item_ref)))?;
    if item.kind() != item_ref.kind {
        return Err(LedgerError::Unresolvable(format!(
            "{} is a {} in the catalog",
            item_ref,
            item.kind()
        )));
    }
    Ok(item)
}

/// Sum a per-product figure over a kit's components, weighted by quantity
fn rollup<F>(kit: &Item, catalog: &Catalog, figure: F) -> LedgerResult<Decimal>
where
    F: Fn(Decimal, Decimal) -> Decimal,
{
    let components = match &kit.details {
        ItemDetails::Kit { components } => components,
        ItemDetails::Product {
            unit_cost,
            unit_price,
        } => return Ok(figure(*unit_cost, *unit_price)),
    };

    let mut total = Decimal::ZERO;
    for component in components {
        validate_kit_component(component)?;
        let item = catalog.get(&component.item_id).ok_or_else(|| {
            LedgerError::Unresolvable(format!(
                "component {} of kit {} not found in catalog",
                component.item_id, kit.id
            ))
        })?;
        let ItemDetails::Product {
            unit_cost,
            unit_price,
        } = item.details
        else {
            return Err(LedgerError::invalid(
                "components",
                format!("kit {} contains kit {}; components must be products", kit.id, item.id),
            ));
        };
        let line = checked_mul(
            "components",
            figure(unit_cost, unit_price),
            Decimal::from(component.quantity),
        )?;
        total = checked_add("components", total, line)?;
    }
    Ok(total)
}

/// Price one transaction line
///
/// Purchases carry no profit: value and cost coincide. Sales earn
/// `quantity × unit_price` and cost `quantity × unit_cost` plus the extra
/// costs, so freight and fees eat into the margin. Only the four outputs are
/// rounded.
pub fn price(
    kind: EntryKind,
    quantity: i32,
    unit_cost: Decimal,
    unit_price: Decimal,
    extra_costs: &[ExtraCost],
) -> LedgerResult<LineFigures> {
    validate_quantity(quantity)?;
    validate_non_negative("unit_cost", unit_cost)?;
    validate_non_negative("unit_price", unit_price)?;
    validate_extra_costs(extra_costs)?;

    let quantity = Decimal::from(quantity);
    let extra_total = checked_sum("extra_costs", extra_costs.iter().map(|c| c.amount))?;
    let base_cost = checked_mul("unit_cost", quantity, unit_cost)?;

    let figures = match kind {
        EntryKind::Purchase => {
            let total_value = checked_add("total_value", base_cost, extra_total)?;
            LineFigures {
                total_value: round_money(total_value),
                total_cost: round_money(total_value),
                net_profit: Decimal::ZERO,
                margin_percent: Decimal::ZERO,
            }
        }
        EntryKind::Sale => {
            let total_value = checked_mul("unit_price", quantity, unit_price)?;
            let total_cost = checked_add("total_cost", base_cost, extra_total)?;
            let net_profit = checked_sub("net_profit", total_value, total_cost)?;
            let margin = percent_of("margin_percent", net_profit, total_value)?;
            LineFigures {
                total_value: round_money(total_value),
                total_cost: round_money(total_cost),
                net_profit: round_money(net_profit),
                margin_percent: round_money(margin),
            }
        }
    };

    Ok(figures)
}
