//! HTTP handlers for the profit ledger API

pub mod health;
pub mod ledger;
pub mod migration;
pub mod reporting;

pub use health::health_check;
pub use ledger::{create_entry, delete_entry, get_entry, list_entries, preview_entry, update_entry};
pub use migration::run_migration;
pub use reporting::get_profitability;
