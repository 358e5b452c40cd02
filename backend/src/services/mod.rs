//! Services backing the profit ledger API

pub mod catalog;
pub mod ledger;
pub mod migration;
pub mod movements;
pub mod ports;
pub mod reporting;

pub use catalog::CatalogService;
pub use ledger::LedgerService;
pub use migration::{MigrationOptions, MigrationService};
pub use movements::MovementService;
pub use ports::{CatalogProvider, InsertOutcome, LedgerSink, MovementProvider};
pub use reporting::ReportingService;
