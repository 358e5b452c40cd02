//! Profitability ledger engine
//!
//! Pure domain logic shared by the backend server and the WASM preview
//! module: valuation of transaction lines and kits, ledger entry building,
//! and period aggregation. No I/O happens in this crate.

pub mod aggregation;
pub mod builder;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;
pub mod valuation;

pub use error::{LedgerError, LedgerResult};
pub use models::*;
pub use types::*;
