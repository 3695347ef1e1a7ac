//! Get, exists, count for error groups, plus loading of the per-group
//! child collections (keywords, tags, comments, seen-by).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Params};

use triage_core::errors::TriageResult;
use triage_core::models::{Comment, ErrorGroup, Frame, JsonMap, UserRef};
use triage_core::{Fingerprint, TriageError};

use crate::to_storage_err;

/// Column list matching [`row_to_group`]. Prefixed with `g.` so it can be
/// used in joins.
pub(crate) const GROUP_COLUMNS: &str = "g.id, g.fingerprint, g.project, g.language, g.error_type, \
     g.message, g.file, g.line, g.context, g.backtrace, g.first_seen, g.last_seen, g.count, \
     g.claimed_by, g.hidden_by";

/// Get a group by id, regardless of project.
pub fn get_group_by_id(conn: &Connection, id: &str) -> TriageResult<Option<ErrorGroup>> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM error_groups g WHERE g.id = ?1");
    query_one(conn, &sql, params![id])
}

/// Get a group by id, scoped to `project`. An id owned by another project
/// is reported as absent.
pub fn get_group(conn: &Connection, project: &str, id: &str) -> TriageResult<Option<ErrorGroup>> {
    let sql =
        format!("SELECT {GROUP_COLUMNS} FROM error_groups g WHERE g.id = ?1 AND g.project = ?2");
    query_one(conn, &sql, params![id, project])
}

pub fn get_group_by_fingerprint(
    conn: &Connection,
    fingerprint: &Fingerprint,
) -> TriageResult<Option<ErrorGroup>> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM error_groups g WHERE g.fingerprint = ?1");
    query_one(conn, &sql, params![fingerprint.as_str()])
}

/// Number of groups in a project.
pub fn count_groups(conn: &Connection, project: &str) -> TriageResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM error_groups WHERE project = ?1",
            params![project],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Fail with `GroupNotFound` unless `id` exists in `project`.
pub fn ensure_group(conn: &Connection, project: &str, id: &str) -> TriageResult<()> {
    let exists = conn
        .prepare_cached("SELECT 1 FROM error_groups WHERE id = ?1 AND project = ?2")
        .and_then(|mut stmt| stmt.exists(params![id, project]))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if exists {
        Ok(())
    } else {
        Err(TriageError::GroupNotFound { id: id.to_string() })
    }
}

fn query_one<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> TriageResult<Option<ErrorGroup>> {
    let result = conn
        .query_row(sql, params, |row| Ok(row_to_group(row)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(Ok(mut group)) => {
            load_children(conn, &mut group)?;
            Ok(Some(group))
        }
        Some(Err(e)) => Err(e),
        None => Ok(None),
    }
}

/// Run a query selecting [`GROUP_COLUMNS`] and hydrate every row.
pub(crate) fn collect_groups<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> TriageResult<Vec<ErrorGroup>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_group(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut groups = Vec::new();
    for row in rows {
        let mut group = row.map_err(|e| to_storage_err(e.to_string()))??;
        load_children(conn, &mut group)?;
        groups.push(group);
    }
    Ok(groups)
}

/// Parse a row selected with [`GROUP_COLUMNS`]. Child collections are
/// left empty; see [`load_children`].
pub(crate) fn row_to_group(row: &rusqlite::Row<'_>) -> TriageResult<ErrorGroup> {
    let fingerprint: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let context_json: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let backtrace_json: String = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;
    let claimed_by: Option<String> = row.get(13).map_err(|e| to_storage_err(e.to_string()))?;
    let hidden_by: Option<String> = row.get(14).map_err(|e| to_storage_err(e.to_string()))?;

    let fingerprint = Fingerprint::try_from(fingerprint)
        .map_err(|e| to_storage_err(format!("parse fingerprint: {e}")))?;
    let context: JsonMap = serde_json::from_str(&context_json)
        .map_err(|e| to_storage_err(format!("parse context: {e}")))?;
    let backtrace: Vec<Frame> = serde_json::from_str(&backtrace_json)
        .map_err(|e| to_storage_err(format!("parse backtrace: {e}")))?;

    Ok(ErrorGroup {
        id: row.get(0).map_err(|e| to_storage_err(e.to_string()))?,
        fingerprint,
        project: row.get(2).map_err(|e| to_storage_err(e.to_string()))?,
        language: row.get(3).map_err(|e| to_storage_err(e.to_string()))?,
        error_type: row.get(4).map_err(|e| to_storage_err(e.to_string()))?,
        message: row.get(5).map_err(|e| to_storage_err(e.to_string()))?,
        file: row.get(6).map_err(|e| to_storage_err(e.to_string()))?,
        line: row.get(7).map_err(|e| to_storage_err(e.to_string()))?,
        context,
        backtrace,
        first_seen: row.get(10).map_err(|e| to_storage_err(e.to_string()))?,
        last_seen: row.get(11).map_err(|e| to_storage_err(e.to_string()))?,
        count: row
            .get::<_, i64>(12)
            .map_err(|e| to_storage_err(e.to_string()))? as u64,
        keywords: BTreeSet::new(),
        tags: Vec::new(),
        comments: Vec::new(),
        seen_by: BTreeSet::new(),
        claimed_by: claimed_by.map(UserRef),
        hidden_by: hidden_by.map(UserRef),
    })
}

/// Fill keywords, tags (attach order), comments (append order) and seen-by.
pub(crate) fn load_children(conn: &Connection, group: &mut ErrorGroup) -> TriageResult<()> {
    group.keywords = query_strings(
        conn,
        "SELECT keyword FROM group_keywords WHERE group_id = ?1",
        &group.id,
    )?
    .into_iter()
    .collect();

    group.tags = query_strings(
        conn,
        "SELECT tag FROM group_tags WHERE group_id = ?1 ORDER BY seq",
        &group.id,
    )?;

    group.seen_by = query_strings(
        conn,
        "SELECT user_ref FROM group_seen_by WHERE group_id = ?1",
        &group.id,
    )?
    .into_iter()
    .map(UserRef)
    .collect();

    group.comments = load_comments(conn, &group.id)?;
    Ok(())
}

fn query_strings(conn: &Connection, sql: &str, group_id: &str) -> TriageResult<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![group_id], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn load_comments(conn: &Connection, group_id: &str) -> TriageResult<Vec<Comment>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT author, body, created_at FROM group_comments
             WHERE group_id = ?1 ORDER BY seq",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![group_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut comments = Vec::new();
    for row in rows {
        let (author, text, created_at) = row.map_err(|e| to_storage_err(e.to_string()))?;
        comments.push(Comment {
            author: UserRef(author),
            text,
            created_at: parse_datetime(&created_at)?,
        });
    }
    Ok(comments)
}

pub(crate) fn parse_datetime(s: &str) -> TriageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
}
