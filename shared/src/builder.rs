//! Ledger entry builder
//!
//! Turns drafts, patches and historical stock movements into fully priced
//! ledger entries. Nothing here persists; callers hand the result to a sink.

use chrono::FixedOffset;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Catalog, EntryKind, Item, ItemRef, LedgerDraft, LedgerEntry, LedgerPatch, StockMovement,
};
use crate::valuation::{price, resolve_item, resolve_unit_cost, resolve_unit_price};
use crate::validation::{validate_non_negative, validate_quantity};

/// Build a new entry from a draft
///
/// A declared item reference must resolve even when both prices are given
/// manually. Manual prices always win over catalog figures.
pub fn build(draft: LedgerDraft, catalog: &Catalog) -> LedgerResult<LedgerEntry> {
    let quantity = draft.quantity.unwrap_or(1);
    validate_quantity(quantity)?;
    if let Some(total) = draft.total_value {
        validate_non_negative("total_value", total)?;
    }

    let item = draft
        .item_ref
        .as_ref()
        .map(|item_ref| resolve_item(item_ref, catalog))
        .transpose()?;
    let flat_unit = draft
        .total_value
        .map(|total| total / Decimal::from(quantity));

    let unit_cost = match (draft.unit_cost, flat_unit, item) {
        (Some(manual), _, _) => manual,
        (None, Some(flat), _) if draft.kind == EntryKind::Purchase => flat,
        (None, _, Some(item)) => resolve_unit_cost(item, catalog)?,
        (None, _, None) => Decimal::ZERO,
    };

    let unit_price = match (draft.unit_price, flat_unit, item) {
        (Some(manual), _, _) => manual,
        (None, Some(flat), _) if draft.kind == EntryKind::Sale => flat,
        (None, _, Some(item)) => resolve_unit_price(item, catalog)?,
        (None, _, None) if draft.kind == EntryKind::Purchase => Decimal::ZERO,
        (None, _, None) => {
            return Err(LedgerError::invalid(
                "unit_price",
                "a sale needs a unit price, a flat total or a catalog item",
            ))
        }
    };

    let figures = price(draft.kind, quantity, unit_cost, unit_price, &draft.extra_costs)?;
    let description = draft
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| default_description(draft.kind, quantity, item));

    let mut entry = LedgerEntry {
        id: Uuid::new_v4(),
        kind: draft.kind,
        date: draft.date,
        item_ref: draft.item_ref,
        quantity,
        unit_cost,
        unit_price,
        extra_costs: draft.extra_costs,
        total_value: Decimal::ZERO,
        total_cost: Decimal::ZERO,
        net_profit: Decimal::ZERO,
        margin_percent: Decimal::ZERO,
        description,
        source_movement_id: None,
    };
    entry.apply_figures(figures);
    Ok(entry)
}

/// Apply an edit and re-derive every computed field
///
/// The input entry is left untouched. A new item reference must resolve;
/// its catalog cost and price replace the old ones unless the patch sets them.
pub fn recompute(
    existing: &LedgerEntry,
    patch: LedgerPatch,
    catalog: &Catalog,
) -> LedgerResult<LedgerEntry> {
    let mut entry = existing.clone();

    if let Some(kind) = patch.kind {
        entry.kind = kind;
    }
    if let Some(date) = patch.date {
        entry.date = date;
    }
    if let Some(quantity) = patch.quantity {
        entry.quantity = quantity;
    }
    if let Some(extra_costs) = patch.extra_costs {
        entry.extra_costs = extra_costs;
    }
    if let Some(description) = patch.description {
        entry.description = description;
    }

    let item_changed = match patch.item_ref {
        Some(item_ref) if item_ref != existing.item_ref => {
            entry.item_ref = item_ref;
            true
        }
        _ => false,
    };

    let item = match entry.item_ref.as_ref() {
        Some(item_ref) if item_changed => Some(resolve_item(item_ref, catalog)?),
        _ => None,
    };

    entry.unit_cost = match (patch.unit_cost, item) {
        (Some(manual), _) => manual,
        (None, Some(item)) => resolve_unit_cost(item, catalog)?,
        (None, None) => entry.unit_cost,
    };
    entry.unit_price = match (patch.unit_price, item) {
        (Some(manual), _) => manual,
        (None, Some(item)) => resolve_unit_price(item, catalog)?,
        (None, None) => entry.unit_price,
    };

    let figures = price(
        entry.kind,
        entry.quantity,
        entry.unit_cost,
        entry.unit_price,
        &entry.extra_costs,
    )?;
    entry.apply_figures(figures);
    Ok(entry)
}

/// Price a historical stock movement into an entry tagged with its source
pub fn build_from_movement(
    movement: &StockMovement,
    catalog: &Catalog,
    offset: FixedOffset,
) -> LedgerResult<LedgerEntry> {
    validate_quantity(movement.quantity)?;
    let item = resolve_item(&movement.item_ref, catalog)?;
    let kind = movement.direction.entry_kind();
    let unit_cost = resolve_unit_cost(item, catalog)?;
    let unit_price = resolve_unit_price(item, catalog)?;
    let figures = price(kind, movement.quantity, unit_cost, unit_price, &[])?;

    let description = movement
        .notes
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Stock {} of {} × {}",
                movement.direction.as_str(),
                movement.quantity,
                item.name
            )
        });

    let mut entry = LedgerEntry {
        id: Uuid::new_v4(),
        kind,
        date: movement.business_date(offset),
        item_ref: Some(movement.item_ref),
        quantity: movement.quantity,
        unit_cost,
        unit_price,
        extra_costs: Vec::new(),
        total_value: Decimal::ZERO,
        total_cost: Decimal::ZERO,
        net_profit: Decimal::ZERO,
        margin_percent: Decimal::ZERO,
        description,
        source_movement_id: Some(movement.id),
    };
    entry.apply_figures(figures);
    Ok(entry)
}

fn default_description(kind: EntryKind, quantity: i32, item: Option<&Item>) -> String {
    match item {
        Some(item) => format!("{} of {} × {}", kind, quantity, item.name),
        None => format!("Manual {}", kind.as_str()),
    }
}

/// Describe a reference for log lines
pub fn describe_ref(item_ref: Option<&ItemRef>) -> String {
    item_ref.map_or_else(|| "no item".to_string(), |r| r.to_string())
}
