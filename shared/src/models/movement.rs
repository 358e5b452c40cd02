//! Historical stock movement models

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntryKind, ItemRef};

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }

    /// Inbound stock was bought, outbound stock was sold
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            MovementDirection::In => EntryKind::Purchase,
            MovementDirection::Out => EntryKind::Sale,
        }
    }
}

/// An inventory IN/OUT event recorded by the stock module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub direction: MovementDirection,
    pub item_ref: ItemRef,
    /// Carried as recorded; malformed history is rejected during migration
    pub quantity: i32,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl StockMovement {
    /// Business date of the movement in the reporting timezone
    pub fn business_date(&self, offset: FixedOffset) -> NaiveDate {
        self.occurred_at.with_timezone(&offset).date_naive()
    }
}
