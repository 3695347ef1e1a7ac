pub mod defaults;
pub mod ingest_config;
pub mod observability_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use ingest_config::IngestConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use crate::errors::{TriageError, TriageResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TriageConfig {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
    pub observability: ObservabilityConfig,
}

impl TriageConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> TriageResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| TriageError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> TriageResult<()> {
        if self.ingest.max_upsert_attempts == 0 {
            return Err(TriageError::ConfigError(
                "ingest.max_upsert_attempts must be at least 1".to_string(),
            ));
        }
        if self.ingest.max_tag_length == 0 {
            return Err(TriageError::ConfigError(
                "ingest.max_tag_length must be at least 1".to_string(),
            ));
        }
        if self.ingest.record_occurrences && self.ingest.occurrence_retention == 0 {
            return Err(TriageError::ConfigError(
                "ingest.occurrence_retention must be at least 1 when occurrences are recorded"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
