use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Comment, Frame, JsonMap, UserRef};
use crate::identity::Fingerprint;

/// The deduplicated aggregate for one fingerprint.
///
/// Identity fields are fixed at creation. `message`, `last_seen` and the
/// diagnostic snapshot track the latest ingest; `count` and `keywords`
/// accumulate; the triage fields are user-managed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorGroup {
    pub id: String,
    pub fingerprint: Fingerprint,
    pub project: String,
    pub language: String,
    pub error_type: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<i64>,
    pub context: JsonMap,
    pub backtrace: Vec<Frame>,
    pub first_seen: f64,
    pub last_seen: f64,
    pub count: u64,
    pub keywords: BTreeSet<String>,
    pub tags: Vec<String>,
    pub comments: Vec<Comment>,
    pub seen_by: BTreeSet<UserRef>,
    pub claimed_by: Option<UserRef>,
    pub hidden_by: Option<UserRef>,
}

/// Display state labels for one group as seen by one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowClass {
    Unseen,
    Seen,
    Hidden,
    Mine,
}

impl RowClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RowClass::Unseen => "unseen",
            RowClass::Seen => "seen",
            RowClass::Hidden => "hidden",
            RowClass::Mine => "mine",
        }
    }
}

impl ErrorGroup {
    pub fn is_hidden(&self) -> bool {
        self.hidden_by.is_some()
    }

    pub fn is_seen_by(&self, user: &UserRef) -> bool {
        self.seen_by.contains(user)
    }

    pub fn is_claimed_by(&self, user: &UserRef) -> bool {
        self.claimed_by.as_ref() == Some(user)
    }

    /// Labels in fixed order: exactly one of `unseen`/`seen`, then
    /// `hidden` and `mine` when they apply.
    pub fn row_classes(&self, viewer: &UserRef) -> Vec<RowClass> {
        let mut classes = Vec::with_capacity(3);
        if self.is_seen_by(viewer) {
            classes.push(RowClass::Seen);
        } else {
            classes.push(RowClass::Unseen);
        }
        if self.is_hidden() {
            classes.push(RowClass::Hidden);
        }
        if self.is_claimed_by(viewer) {
            classes.push(RowClass::Mine);
        }
        classes
    }

    /// Space-separated form of [`row_classes`](Self::row_classes).
    pub fn row_class_string(&self, viewer: &UserRef) -> String {
        self.row_classes(viewer)
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
