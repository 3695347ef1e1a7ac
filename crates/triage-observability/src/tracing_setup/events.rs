//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// A new fingerprint was seen for the first time.
pub fn group_created(group_id: &str, fingerprint: &str, project: &str) {
    tracing::info!(
        event = "group_created",
        group_id = %group_id,
        fingerprint = %fingerprint,
        project = %project,
        "error group created"
    );
}

/// An existing group matched another report.
pub fn group_recurred(group_id: &str, fingerprint: &str, count: u64) {
    tracing::debug!(
        event = "group_recurred",
        group_id = %group_id,
        fingerprint = %fingerprint,
        count = count,
        "error group recurred"
    );
}

/// A hidden group recurred and was put back into the active view.
pub fn group_unhidden(group_id: &str, fingerprint: &str) {
    tracing::info!(
        event = "group_unhidden",
        group_id = %group_id,
        fingerprint = %fingerprint,
        "hidden error group recurred"
    );
}

/// Insert lost the race for a fingerprint; the update path is retried.
pub fn upsert_conflict_retried(fingerprint: &str, attempt: u32) {
    tracing::warn!(
        event = "upsert_conflict_retried",
        fingerprint = %fingerprint,
        attempt = attempt,
        "concurrent insert for fingerprint, retrying update"
    );
}

pub fn tag_attached(group_id: &str, tag: &str) {
    tracing::info!(event = "tag_attached", group_id = %group_id, tag = %tag, "tag attached");
}

pub fn tag_detached(group_id: &str, tag: &str) {
    tracing::info!(event = "tag_detached", group_id = %group_id, tag = %tag, "tag detached");
}

pub fn comment_added(group_id: &str, author: &str) {
    tracing::info!(
        event = "comment_added",
        group_id = %group_id,
        author = %author,
        "comment added"
    );
}
