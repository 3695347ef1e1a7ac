/// Version tag mixed into every fingerprint. Changing the canonical identity
/// encoding requires bumping this, which splits every existing group.
pub const FINGERPRINT_VERSION: &str = "triage-identity-v1";

/// Maximum length of a single tag, in characters.
pub const MAX_TAG_LENGTH: usize = 30;

/// Maximum number of update/insert rounds for one ingest before giving up.
pub const MAX_UPSERT_ATTEMPTS: u32 = 3;

/// Default number of raw occurrences retained per fingerprint.
pub const DEFAULT_OCCURRENCE_RETENTION: usize = 100;
