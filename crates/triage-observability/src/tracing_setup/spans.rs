//! Span definitions per operation: ingest, triage actions, queries.

/// Create an ingest span.
#[macro_export]
macro_rules! ingest_span {
    ($project:expr, $error_type:expr) => {
        tracing::info_span!("triage.ingest", project = %$project, error_type = %$error_type)
    };
}

/// Create a span for a triage action on one group.
#[macro_export]
macro_rules! triage_op_span {
    ($op:expr, $group_id:expr) => {
        tracing::debug_span!("triage.op", op = %$op, group_id = %$group_id)
    };
}

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($project:expr, $kind:expr) => {
        tracing::debug_span!("triage.query", project = %$project, kind = %$kind)
    };
}
