//! Backfill migration run models

use serde::{Deserialize, Serialize};

use super::ItemKind;

/// Which movements a backfill run considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationScope {
    Products,
    Kits,
}

impl MigrationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationScope::Products => "products",
            MigrationScope::Kits => "kits",
        }
    }

    pub fn item_kind(&self) -> ItemKind {
        match self {
            MigrationScope::Products => ItemKind::Product,
            MigrationScope::Kits => ItemKind::Kit,
        }
    }
}

impl std::str::FromStr for MigrationScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(MigrationScope::Products),
            "kits" => Ok(MigrationScope::Kits),
            other => Err(format!("unknown migration scope '{}'", other)),
        }
    }
}

/// Outcome of a single movement within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementOutcome {
    Created,
    Skipped,
    Errored,
}

/// Tally of one backfill invocation; never persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationRun {
    pub scope: MigrationScope,
    pub total: i64,
    pub created: i64,
    pub skipped: i64,
    pub errors: i64,
    pub batches_completed: i64,
    /// Stopped at a batch boundary (deadline or cancellation)
    pub interrupted: bool,
    pub message: String,
}

impl MigrationRun {
    pub fn new(scope: MigrationScope, total: i64) -> Self {
        Self {
            scope,
            total,
            created: 0,
            skipped: 0,
            errors: 0,
            batches_completed: 0,
            interrupted: false,
            message: String::new(),
        }
    }

    pub fn record(&mut self, outcome: MovementOutcome) {
        match outcome {
            MovementOutcome::Created => self.created += 1,
            MovementOutcome::Skipped => self.skipped += 1,
            MovementOutcome::Errored => self.errors += 1,
        }
    }

    pub fn processed(&self) -> i64 {
        self.created + self.skipped + self.errors
    }

    /// Fill in the human-readable summary
    pub fn finish(mut self) -> Self {
        let mut message = format!(
            "{} created, {} skipped, {} errors",
            self.created, self.skipped, self.errors
        );
        if self.interrupted {
            message.push_str(&format!(
                " (interrupted after {} of {} movements)",
                self.processed(),
                self.total
            ));
        }
        self.message = message;
        self
    }
}
