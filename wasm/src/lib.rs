//! WebAssembly module for the Profit Ledger
//!
//! Runs the same pricing code as the server so the entry form can show
//! totals, profit and margin while the user types:
//! - Line pricing and draft previews
//! - Kit cost rollup
//! - Period aggregation of already-loaded entries

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use shared::aggregation::{aggregate, growth_percent};
use shared::builder::build;
use shared::valuation::{price, resolve_unit_cost};
use shared::{Catalog, EntryKind, ExtraCost, Item, LedgerDraft, LedgerEntry};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str(concat!(
        "profit-ledger-wasm ",
        env!("CARGO_PKG_VERSION")
    )));
}

/// Price one line; returns the four computed figures as JSON
#[wasm_bindgen]
pub fn price_line(
    kind: &str,
    quantity: i32,
    unit_cost: &str,
    unit_price: &str,
    extra_costs_json: &str,
) -> Result<String, JsValue> {
    price_line_json(kind, quantity, unit_cost, unit_price, extra_costs_json).map_err(to_js)
}

/// Build a full entry from a draft against a catalog snapshot, without saving
#[wasm_bindgen]
pub fn preview_entry(draft_json: &str, catalog_json: &str) -> Result<String, JsValue> {
    preview_entry_json(draft_json, catalog_json).map_err(to_js)
}

/// Unit cost of a product or kit in the given catalog
#[wasm_bindgen]
pub fn item_unit_cost(item_id: &str, catalog_json: &str) -> Result<String, JsValue> {
    item_unit_cost_str(item_id, catalog_json).map_err(to_js)
}

/// Daily series and KPIs for entries already held by the client
#[wasm_bindgen]
pub fn aggregate_entries(entries_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    aggregate_entries_json(entries_json, from, to).map_err(to_js)
}

/// Profit growth percentage; zero when the previous profit is not positive
#[wasm_bindgen]
pub fn profit_growth(current: &str, previous: &str) -> Result<String, JsValue> {
    profit_growth_str(current, previous).map_err(to_js)
}

fn to_js(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|e| format!("Invalid {}: {}", field, e))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::from_str(raw.trim()).map_err(|e| format!("Invalid {}: {}", field, e))
}

fn parse_catalog(catalog_json: &str) -> Result<Catalog, String> {
    let items: Vec<Item> = serde_json::from_str(catalog_json)
        .map_err(|e| format!("Invalid catalog JSON: {}", e))?;
    Ok(Catalog::from_items(items))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn profit_growth_str(current: &str, previous: &str) -> Result<String, String> {
    let current = parse_decimal("current", current)?;
    let previous = parse_decimal("previous", previous)?;
    let growth = growth_percent(current, previous).map_err(|e| e.to_string())?;
    Ok(growth.to_string())
}

fn price_line_json(
    kind: &str,
    quantity: i32,
    unit_cost: &str,
    unit_price: &str,
    extra_costs_json: &str,
) -> Result<String, String> {
    let kind: EntryKind = kind.parse()?;
    let unit_cost = parse_decimal("unit_cost", unit_cost)?;
    let unit_price = parse_decimal("unit_price", unit_price)?;
    let extra_costs: Vec<ExtraCost> = if extra_costs_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(extra_costs_json)
            .map_err(|e| format!("Invalid extra costs JSON: {}", e))?
    };

    let figures = price(kind, quantity, unit_cost, unit_price, &extra_costs)
        .map_err(|e| e.to_string())?;
    to_json(&figures)
}

fn preview_entry_json(draft_json: &str, catalog_json: &str) -> Result<String, String> {
    let draft: LedgerDraft =
        serde_json::from_str(draft_json).map_err(|e| format!("Invalid draft JSON: {}", e))?;
    let catalog = parse_catalog(catalog_json)?;
    let entry = build(draft, &catalog).map_err(|e| e.to_string())?;
    to_json(&entry)
}

fn item_unit_cost_str(item_id: &str, catalog_json: &str) -> Result<String, String> {
    let id = Uuid::parse_str(item_id.trim()).map_err(|e| format!("Invalid item id: {}", e))?;
    let catalog = parse_catalog(catalog_json)?;
    let item = catalog
        .get(&id)
        .ok_or_else(|| format!("Item {} not in catalog", id))?;
    let cost = resolve_unit_cost(item, &catalog).map_err(|e| e.to_string())?;
    Ok(cost.to_string())
}

fn aggregate_entries_json(entries_json: &str, from: &str, to: &str) -> Result<String, String> {
    let entries: Vec<LedgerEntry> =
        serde_json::from_str(entries_json).map_err(|e| format!("Invalid entries JSON: {}", e))?;
    let report = aggregate(&entries, parse_date("from", from)?, parse_date("to", to)?)
        .map_err(|e| e.to_string())?;
    to_json(&report)
}
