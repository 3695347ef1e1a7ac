//! Bounded per-fingerprint occurrence log.

use rusqlite::{params, Connection};

use triage_core::errors::TriageResult;
use triage_core::models::{Frame, JsonMap, Occurrence};
use triage_core::Fingerprint;

use super::group_upsert::EncodedReport;
use crate::{map_sqlite_err, to_storage_err};

/// Append one occurrence, then drop all but the newest `retention` for the
/// fingerprint. Returns the number of rows trimmed.
pub fn record(
    conn: &Connection,
    fingerprint: &Fingerprint,
    encoded: &EncodedReport<'_>,
    retention: usize,
) -> TriageResult<usize> {
    let report = encoded.report;
    conn.prepare_cached(
        "INSERT INTO occurrences (fingerprint, timestamp, message, file, line, context, backtrace)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            fingerprint.as_str(),
            report.timestamp,
            report.message,
            report.file,
            report.line,
            encoded.context_json,
            encoded.backtrace_json,
        ])
    })
    .map_err(|e| map_sqlite_err("insert occurrence", e))?;

    trim(conn, fingerprint, retention)
}

/// Keep only the newest `retention` occurrences for a fingerprint.
pub fn trim(conn: &Connection, fingerprint: &Fingerprint, retention: usize) -> TriageResult<usize> {
    conn.prepare_cached(
        "DELETE FROM occurrences
         WHERE fingerprint = ?1
           AND seq NOT IN (
               SELECT seq FROM occurrences WHERE fingerprint = ?1
               ORDER BY seq DESC LIMIT ?2
           )",
    )
    .and_then(|mut stmt| stmt.execute(params![fingerprint.as_str(), retention as i64]))
    .map_err(|e| map_sqlite_err("trim occurrences", e))
}

/// Newest first, at most `limit`.
pub fn list(
    conn: &Connection,
    fingerprint: &Fingerprint,
    limit: usize,
) -> TriageResult<Vec<Occurrence>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT timestamp, message, file, line, context, backtrace
             FROM occurrences WHERE fingerprint = ?1
             ORDER BY seq DESC LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![fingerprint.as_str(), limit as i64], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut occurrences = Vec::new();
    for row in rows {
        let (timestamp, message, file, line, context_json, backtrace_json) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let context: JsonMap = serde_json::from_str(&context_json)
            .map_err(|e| to_storage_err(format!("parse occurrence context: {e}")))?;
        let backtrace: Vec<Frame> = serde_json::from_str(&backtrace_json)
            .map_err(|e| to_storage_err(format!("parse occurrence backtrace: {e}")))?;
        occurrences.push(Occurrence {
            fingerprint: fingerprint.clone(),
            timestamp,
            message,
            file,
            line,
            context,
            backtrace,
        });
    }
    Ok(occurrences)
}
