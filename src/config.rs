//! Ledger configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! [projection]
//! batch_size = 100
//! poll_interval_ms = 50
//!
//! [query]
//! max_page_size = 1000
//!
//! [bulk]
//! id_length = 11
//! report_interval_ms = 1000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest generated card id: a uuid in simple (unhyphenated) form.
pub const MAX_ID_LENGTH: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
}

impl LedgerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projection.batch_size == 0 {
            return Err(ConfigError::Validation(
                "projection.batch_size must be at least 1".to_string(),
            ));
        }
        if self.query.max_page_size == 0 {
            return Err(ConfigError::Validation(
                "query.max_page_size must be at least 1".to_string(),
            ));
        }
        if self.bulk.id_length == 0 || self.bulk.id_length > MAX_ID_LENGTH {
            return Err(ConfigError::Validation(format!(
                "bulk.id_length must be between 1 and {}, got {}",
                MAX_ID_LENGTH, self.bulk.id_length
            )));
        }
        Ok(())
    }
}

/// Projection worker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Events read from the feed per poll.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ProjectionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Upper bound applied to every fetch `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
        }
    }
}

/// Bulk issuance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkConfig {
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// How often the progress callback fires while issuing.
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
}

impl BulkConfig {
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            id_length: default_id_length(),
            report_interval_ms: default_report_interval_ms(),
        }
    }
}

fn default_batch_size() -> usize {
    100
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_max_page_size() -> usize {
    1000
}

fn default_id_length() -> usize {
    11
}

fn default_report_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
