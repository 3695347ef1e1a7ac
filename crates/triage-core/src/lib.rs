//! # triage-core
//!
//! Foundation crate for the triage error aggregator.
//! Defines the report/group types, identity hashing, storage traits,
//! errors, config, and constants. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TriageConfig;
pub use errors::{TriageError, TriageResult};
pub use identity::{Fingerprint, Identity};
pub use models::{
    Comment, ErrorGroup, ErrorReport, IngestOutcome, Occurrence, RowClass, Tag, UserRef, View,
};
