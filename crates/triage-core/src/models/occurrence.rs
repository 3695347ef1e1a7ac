use serde::{Deserialize, Serialize};

use super::{Frame, JsonMap};
use crate::identity::Fingerprint;

/// One raw ingest kept in the bounded per-fingerprint occurrence log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub fingerprint: Fingerprint,
    pub timestamp: f64,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<i64>,
    pub context: JsonMap,
    pub backtrace: Vec<Frame>,
}
