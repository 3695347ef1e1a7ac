use crate::errors::TriageResult;
use crate::identity::Fingerprint;
use crate::models::{
    Comment, ErrorGroup, ErrorReport, IngestOutcome, Occurrence, Tag, UserRef, View,
};

/// Aggregate store: ingest, lookup, triage transitions, and queries over error groups.
///
/// Every mutation is atomic on a single group. Triage operations are keyed by
/// project and group id; an id that is absent, or belongs to another project,
/// yields `TriageError::GroupNotFound` with nothing mutated.
pub trait IErrorGroupStorage: Send + Sync {
    // --- Ingest ---
    fn ingest(&self, report: &ErrorReport) -> TriageResult<IngestOutcome>;

    // --- Lookup ---
    fn get_group(&self, project: &str, group_id: &str) -> TriageResult<Option<ErrorGroup>>;
    fn get_by_fingerprint(&self, fingerprint: &Fingerprint) -> TriageResult<Option<ErrorGroup>>;
    fn count_groups(&self, project: &str) -> TriageResult<usize>;
    fn occurrences(&self, fingerprint: &Fingerprint, limit: usize) -> TriageResult<Vec<Occurrence>>;

    // --- Triage ---
    /// Returns true if the tag was newly attached.
    fn tag(&self, project: &str, group_id: &str, tag: &str) -> TriageResult<bool>;
    /// Returns true if the tag was present and removed.
    fn untag(&self, project: &str, group_id: &str, tag: &str) -> TriageResult<bool>;
    fn comment(
        &self,
        project: &str,
        group_id: &str,
        author: &UserRef,
        text: &str,
    ) -> TriageResult<Comment>;
    fn claim(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<()>;
    fn unclaim(&self, project: &str, group_id: &str) -> TriageResult<()>;
    /// Returns true if `user` had not seen the group before.
    fn mark_seen(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<bool>;
    fn hide(&self, project: &str, group_id: &str, user: &UserRef) -> TriageResult<()>;
    fn unhide(&self, project: &str, group_id: &str) -> TriageResult<()>;

    // --- Query ---
    fn list(&self, project: &str, view: View, viewer: &UserRef) -> TriageResult<Vec<ErrorGroup>>;
    fn search(&self, project: &str, query: &str) -> TriageResult<Vec<ErrorGroup>>;
}

/// Global tag popularity counters.
pub trait ITagCatalog: Send + Sync {
    fn increment(&self, tag: &str) -> TriageResult<Tag>;
    /// Clamped at zero. `None` when the tag was never created.
    fn decrement(&self, tag: &str) -> TriageResult<Option<Tag>>;
    fn get_tag(&self, tag: &str) -> TriageResult<Option<Tag>>;
    /// Count descending, ties broken by creation order (oldest first).
    fn list_tags(&self) -> TriageResult<Vec<Tag>>;
}
