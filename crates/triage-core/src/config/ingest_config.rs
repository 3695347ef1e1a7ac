use serde::{Deserialize, Serialize};

use super::defaults;

/// Ingest and triage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Maximum tag length in characters.
    pub max_tag_length: usize,
    /// Update/insert rounds per ingest before a conflict is surfaced.
    pub max_upsert_attempts: u32,
    /// Append every ingest to the per-fingerprint occurrence log.
    pub record_occurrences: bool,
    /// Newest occurrences kept per fingerprint.
    pub occurrence_retention: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_tag_length: defaults::DEFAULT_MAX_TAG_LENGTH,
            max_upsert_attempts: defaults::DEFAULT_MAX_UPSERT_ATTEMPTS,
            record_occurrences: defaults::DEFAULT_RECORD_OCCURRENCES,
            occurrence_retention: defaults::DEFAULT_OCCURRENCE_RETENTION,
        }
    }
}
