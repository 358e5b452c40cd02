//! Catalog item models (products and kits)

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of catalog item a reference points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Product,
    Kit,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Product => "product",
            ItemKind::Kit => "kit",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ItemKind::Product),
            "kit" => Ok(ItemKind::Kit),
            other => Err(format!("unknown item kind '{}'", other)),
        }
    }
}

/// Tagged reference to a catalog item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: Uuid,
}

impl ItemRef {
    pub fn product(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Product,
            id,
        }
    }

    pub fn kit(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Kit,
            id,
        }
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// One line of a kit's bill of materials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitComponent {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Cost and price data specific to each item kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    Product {
        unit_cost: Decimal,
        unit_price: Decimal,
    },
    /// A kit has no stored cost or price; both derive from its components
    Kit { components: Vec<KitComponent> },
}

/// A catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl Item {
    pub fn product(id: Uuid, name: impl Into<String>, unit_cost: Decimal, unit_price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            details: ItemDetails::Product {
                unit_cost,
                unit_price,
            },
        }
    }

    pub fn kit(id: Uuid, name: impl Into<String>, components: Vec<KitComponent>) -> Self {
        Self {
            id,
            name: name.into(),
            details: ItemDetails::Kit { components },
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self.details {
            ItemDetails::Product { .. } => ItemKind::Product,
            ItemDetails::Kit { .. } => ItemKind::Kit,
        }
    }
}

/// Point-in-time snapshot of one tenant's catalog, keyed by item id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<Uuid, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    /// Insert or replace an item
    pub fn upsert(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn get(&self, id: &Uuid) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
