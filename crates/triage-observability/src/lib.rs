//! # triage-observability
//!
//! Tracing subscriber setup, span macros, and one structured event per
//! domain action (group created/recurred/unhidden, tag attached/detached,
//! comment added, upsert conflict retried).

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
