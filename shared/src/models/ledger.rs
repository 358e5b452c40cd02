//! Ledger entry models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemRef;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Purchase,
    Sale,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Purchase => "purchase",
            EntryKind::Sale => "sale",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Purchase => write!(f, "Purchase"),
            EntryKind::Sale => write!(f, "Sale"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(EntryKind::Purchase),
            "sale" => Ok(EntryKind::Sale),
            other => Err(format!("unknown entry kind '{}'", other)),
        }
    }
}

/// A named charge added on top of the base cost (freight, fee, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraCost {
    pub label: String,
    pub amount: Decimal,
}

impl ExtraCost {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// The four derived figures of a priced transaction line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineFigures {
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
    pub margin_percent: Decimal,
}

/// A recorded purchase or sale with its derived financial figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub item_ref: Option<ItemRef>,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub unit_price: Decimal,
    pub extra_costs: Vec<ExtraCost>,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
    pub margin_percent: Decimal,
    pub description: String,
    /// Set on entries created by the backfill; the idempotency marker
    pub source_movement_id: Option<Uuid>,
}

impl LedgerEntry {
    /// Replace all four computed fields together
    pub(crate) fn apply_figures(&mut self, figures: LineFigures) {
        self.total_value = figures.total_value;
        self.total_cost = figures.total_cost;
        self.net_profit = figures.net_profit;
        self.margin_percent = figures.margin_percent;
    }
}

/// User-supplied input for a new ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerDraft {
    pub kind: EntryKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub item_ref: Option<ItemRef>,
    /// Defaults to 1
    #[serde(default)]
    pub quantity: Option<i32>,
    /// Manual override; wins over the catalog cost
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    /// Flat total for callers that know the total rather than the unit price
    #[serde(default)]
    pub total_value: Option<Decimal>,
    #[serde(default)]
    pub extra_costs: Vec<ExtraCost>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LedgerDraft {
    pub fn new(kind: EntryKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            item_ref: None,
            quantity: None,
            unit_cost: None,
            unit_price: None,
            total_value: None,
            extra_costs: Vec::new(),
            description: None,
        }
    }

    pub fn with_item(mut self, item_ref: ItemRef) -> Self {
        self.item_ref = Some(item_ref);
        self
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: Decimal) -> Self {
        self.unit_cost = Some(unit_cost);
        self
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_total_value(mut self, total_value: Decimal) -> Self {
        self.total_value = Some(total_value);
        self
    }

    pub fn with_extra_cost(mut self, label: impl Into<String>, amount: Decimal) -> Self {
        self.extra_costs.push(ExtraCost::new(label, amount));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for an existing entry; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerPatch {
    #[serde(default)]
    pub kind: Option<EntryKind>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// `Some(None)` detaches the entry from its catalog item
    #[serde(default, with = "double_option")]
    pub item_ref: Option<Option<ItemRef>>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub unit_cost: Option<Decimal>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub extra_costs: Option<Vec<ExtraCost>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LedgerPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.date.is_none()
            && self.item_ref.is_none()
            && self.quantity.is_none()
            && self.unit_cost.is_none()
            && self.unit_price.is_none()
            && self.extra_costs.is_none()
            && self.description.is_none()
    }
}

/// Distinguishes an absent field from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
