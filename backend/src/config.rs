//! Configuration management for the profit ledger server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with LEDGER_ prefix

use std::time::Duration;

use chrono::FixedOffset;
use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Reporting calendar configuration
    pub reporting: ReportingConfig,

    /// Backfill migration configuration
    pub migration: MigrationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportingConfig {
    /// Offset of the reporting timezone from UTC, in minutes (e.g. -180)
    pub utc_offset_minutes: i32,
}

impl ReportingConfig {
    pub fn offset(&self) -> Result<FixedOffset, String> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            format!(
                "reporting.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MigrationConfig {
    /// Movements processed between cancellation checks
    pub batch_size: usize,

    /// Wall-clock budget for one run in seconds; 0 disables the deadline
    pub time_budget_secs: u64,
}

impl MigrationConfig {
    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_secs > 0).then(|| Duration::from_secs(self.time_budget_secs))
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("LEDGER_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("reporting.utc_offset_minutes", 0)?
            .set_default("migration.batch_size", 100)?
            .set_default("migration.time_budget_secs", 300)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LEDGER_ prefix)
            .add_source(
                Environment::with_prefix("LEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.migration.batch_size == 0 {
            return Err(ConfigError::Message(
                "migration.batch_size must be at least 1".to_string(),
            ));
        }
        self.reporting.offset().map_err(ConfigError::Message)?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            time_budget_secs: 300,
        }
    }
}
