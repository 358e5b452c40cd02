//! Input validation for ledger figures
//!
//! Every check rejects explicitly; nothing is clamped into range.

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExtraCost, KitComponent};

/// Quantity must be at least one unit
pub fn validate_quantity(quantity: i32) -> LedgerResult<()> {
    if quantity < 1 {
        return Err(LedgerError::invalid(
            "quantity",
            format!("must be at least 1, got {}", quantity),
        ));
    }
    Ok(())
}

/// Monetary amount must not be negative
pub fn validate_non_negative(field: &str, amount: Decimal) -> LedgerResult<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid(
            field,
            format!("must not be negative, got {}", amount),
        ));
    }
    Ok(())
}

/// Extra costs need a label and a non-negative amount
pub fn validate_extra_costs(extra_costs: &[ExtraCost]) -> LedgerResult<()> {
    for (index, cost) in extra_costs.iter().enumerate() {
        if cost.label.trim().is_empty() {
            return Err(LedgerError::invalid(
                format!("extra_costs[{}].label", index),
                "must not be blank",
            ));
        }
        validate_non_negative(&format!("extra_costs[{}].amount", index), cost.amount)?;
    }
    Ok(())
}

pub fn validate_kit_component(component: &KitComponent) -> LedgerResult<()> {
    if component.quantity < 1 {
        return Err(LedgerError::invalid(
            "components.quantity",
            format!(
                "component {} must have a positive quantity, got {}",
                component.item_id, component.quantity
            ),
        ));
    }
    Ok(())
}
