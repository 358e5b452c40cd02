//! Domain models for the profitability ledger

mod item;
mod ledger;
mod migration;
mod movement;
mod report;

pub use item::*;
pub use ledger::*;
pub use migration::*;
pub use movement::*;
pub use report::*;
