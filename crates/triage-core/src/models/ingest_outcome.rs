use serde::{Deserialize, Serialize};

use super::ErrorGroup;
use crate::identity::Fingerprint;

/// Result of one ingest: the group's identity and post-update state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    pub fingerprint: Fingerprint,
    pub group_id: String,
    pub count: u64,
    /// True when this ingest created the group.
    pub created: bool,
    pub group: ErrorGroup,
}
