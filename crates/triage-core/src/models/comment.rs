use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;

/// A triage comment. Immutable once appended to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: UserRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
