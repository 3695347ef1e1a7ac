// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "triage.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Ingest ---
pub const DEFAULT_MAX_TAG_LENGTH: usize = crate::constants::MAX_TAG_LENGTH;
pub const DEFAULT_MAX_UPSERT_ATTEMPTS: u32 = crate::constants::MAX_UPSERT_ATTEMPTS;
pub const DEFAULT_RECORD_OCCURRENCES: bool = true;
pub const DEFAULT_OCCURRENCE_RETENTION: usize = crate::constants::DEFAULT_OCCURRENCE_RETENTION;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_LOG_JSON: bool = true;
