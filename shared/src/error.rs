//! Error taxonomy for the ledger engine

use thiserror::Error;

/// Errors raised by valuation, entry building, aggregation and migration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Negative amounts, non-positive quantities, inverted date ranges
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// A referenced item or kit component does not exist in the catalog
    #[error("Unresolvable reference: {0}")]
    Unresolvable(String),

    /// A collaborator (catalog, movement source, ledger sink) could not be reached
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput { .. } => "INVALID_INPUT",
            LedgerError::Unresolvable(_) => "UNRESOLVABLE",
            LedgerError::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
