//! Conditional update-or-insert of an error group, keyed by fingerprint.
//!
//! Runs inside the caller's immediate transaction. The counter is only ever
//! bumped by `count = count + 1` in SQL, never read-modified-written, so
//! concurrent ingests of one fingerprint cannot lose increments.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use triage_core::errors::{StorageError, TriageResult};
use triage_core::identity::fold_case;
use triage_core::{ErrorReport, Fingerprint};
use triage_observability::events;

use crate::{is_unique_violation, map_sqlite_err, to_storage_err};

/// A report with its JSON columns serialized once, shared by the group
/// upsert and the occurrence log.
pub struct EncodedReport<'a> {
    pub report: &'a ErrorReport,
    pub context_json: String,
    pub backtrace_json: String,
}

impl<'a> EncodedReport<'a> {
    pub fn new(report: &'a ErrorReport) -> TriageResult<Self> {
        Ok(Self {
            report,
            context_json: serde_json::to_string(&report.context)?,
            backtrace_json: serde_json::to_string(&report.backtrace)?,
        })
    }
}

/// What the upsert did to the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub group_id: String,
    pub created: bool,
    /// The group was hidden and this ingest cleared it.
    pub unhidden: bool,
}

/// Update the group for `fingerprint` if it exists, insert it otherwise.
///
/// A unique violation on insert means another writer created the group
/// first; the update is retried, at most `max_attempts` rounds in total.
pub fn upsert_group(
    conn: &Connection,
    encoded: &EncodedReport<'_>,
    fingerprint: &Fingerprint,
    keywords: &BTreeSet<String>,
    max_attempts: u32,
) -> TriageResult<UpsertOutcome> {
    let was_hidden = is_hidden(conn, fingerprint)?;
    let (group_id, created) = retry_upsert(
        fingerprint,
        max_attempts,
        || update_existing(conn, encoded, fingerprint),
        |group_id| insert_new(conn, group_id, encoded, fingerprint),
    )?;
    add_keywords(conn, &group_id, keywords)?;
    Ok(UpsertOutcome {
        group_id,
        created,
        unhidden: was_hidden && !created,
    })
}

/// The update / insert / retry-update loop. `update` returns the matched
/// group id; `insert` creates a group under the given fresh id. Returns the
/// group id and whether this call created it.
fn retry_upsert<U, I>(
    fingerprint: &Fingerprint,
    max_attempts: u32,
    mut update: U,
    mut insert: I,
) -> TriageResult<(String, bool)>
where
    U: FnMut() -> TriageResult<Option<String>>,
    I: FnMut(&str) -> rusqlite::Result<()>,
{
    for attempt in 1..=max_attempts {
        if let Some(group_id) = update()? {
            return Ok((group_id, false));
        }

        let group_id = Uuid::new_v4().to_string();
        match insert(&group_id) {
            Ok(()) => return Ok((group_id, true)),
            Err(e) if is_unique_violation(&e) => {
                events::upsert_conflict_retried(fingerprint.as_str(), attempt);
            }
            Err(e) => return Err(map_sqlite_err("insert error group", e)),
        }
    }

    Err(StorageError::UpsertConflict {
        fingerprint: fingerprint.to_string(),
        attempts: max_attempts,
    }
    .into())
}

fn is_hidden(conn: &Connection, fingerprint: &Fingerprint) -> TriageResult<bool> {
    let hidden: Option<bool> = conn
        .prepare_cached("SELECT hidden_by IS NOT NULL FROM error_groups WHERE fingerprint = ?1")
        .and_then(|mut stmt| {
            stmt.query_row(params![fingerprint.as_str()], |row| row.get(0))
                .optional()
        })
        .map_err(|e| map_sqlite_err("read hidden state", e))?;
    Ok(hidden.unwrap_or(false))
}

/// Returns the group id when a row matched.
fn update_existing(
    conn: &Connection,
    encoded: &EncodedReport<'_>,
    fingerprint: &Fingerprint,
) -> TriageResult<Option<String>> {
    let report = encoded.report;
    conn.prepare_cached(
        "UPDATE error_groups SET
            message = ?2, last_seen = ?3, file = ?4, line = ?5,
            context = ?6, backtrace = ?7,
            count = count + 1, hidden_by = NULL
         WHERE fingerprint = ?1
         RETURNING id",
    )
    .and_then(|mut stmt| {
        stmt.query_row(
            params![
                fingerprint.as_str(),
                report.message,
                report.timestamp,
                report.file,
                report.line,
                encoded.context_json,
                encoded.backtrace_json,
            ],
            |row| row.get(0),
        )
        .optional()
    })
    .map_err(|e| map_sqlite_err("update error group", e))
}

fn insert_new(
    conn: &Connection,
    group_id: &str,
    encoded: &EncodedReport<'_>,
    fingerprint: &Fingerprint,
) -> rusqlite::Result<()> {
    let report = encoded.report;
    conn.prepare_cached(
        "INSERT INTO error_groups (
            id, fingerprint, project, language, error_type, type_folded,
            message, file, line, context, backtrace,
            first_seen, last_seen, count
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12, 1)",
    )?
    .execute(params![
        group_id,
        fingerprint.as_str(),
        report.project,
        report.language,
        report.error_type,
        fold_case(&report.error_type),
        report.message,
        report.file,
        report.line,
        encoded.context_json,
        encoded.backtrace_json,
        report.timestamp,
    ])?;
    Ok(())
}

/// Union `keywords` into the group's keyword set.
fn add_keywords(
    conn: &Connection,
    group_id: &str,
    keywords: &BTreeSet<String>,
) -> TriageResult<()> {
    let mut stmt = conn
        .prepare_cached("INSERT OR IGNORE INTO group_keywords (group_id, keyword) VALUES (?1, ?2)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    for keyword in keywords {
        stmt.execute(params![group_id, keyword])
            .map_err(|e| map_sqlite_err("insert keyword", e))?;
    }
    Ok(())
}
