//! Global tag catalog counters.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use triage_core::errors::TriageResult;
use triage_core::Tag;

use super::group_crud::parse_datetime;
use crate::{map_sqlite_err, to_storage_err};

/// Create the tag at count 1, or bump its count.
pub fn increment(conn: &Connection, tag: &str) -> TriageResult<Tag> {
    let row = conn
        .prepare_cached(
            "INSERT INTO tags (tag, count, created_at) VALUES (?1, 1, ?2)
             ON CONFLICT(tag) DO UPDATE SET count = count + 1
             RETURNING tag, count, created_at",
        )
        .and_then(|mut stmt| stmt.query_row(params![tag, Utc::now().to_rfc3339()], read_row))
        .map_err(|e| map_sqlite_err("increment tag", e))?;
    row_to_tag(row)
}

/// Decrement, clamped at zero. `None` when the tag was never created.
pub fn decrement(conn: &Connection, tag: &str) -> TriageResult<Option<Tag>> {
    conn.prepare_cached(
        "UPDATE tags SET count = MAX(count - 1, 0) WHERE tag = ?1
         RETURNING tag, count, created_at",
    )
    .and_then(|mut stmt| stmt.query_row(params![tag], read_row).optional())
    .map_err(|e| map_sqlite_err("decrement tag", e))?
    .map(row_to_tag)
    .transpose()
}

pub fn get_tag(conn: &Connection, tag: &str) -> TriageResult<Option<Tag>> {
    conn.prepare_cached("SELECT tag, count, created_at FROM tags WHERE tag = ?1")
        .and_then(|mut stmt| stmt.query_row(params![tag], read_row).optional())
        .map_err(|e| to_storage_err(e.to_string()))?
        .map(row_to_tag)
        .transpose()
}

/// Count descending, then creation order.
pub fn list_tags(conn: &Connection) -> TriageResult<Vec<Tag>> {
    let mut stmt = conn
        .prepare_cached("SELECT tag, count, created_at FROM tags ORDER BY count DESC, seq ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut tags = Vec::new();
    for row in rows {
        tags.push(row_to_tag(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(tags)
}

type TagRow = (String, i64, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TagRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn row_to_tag((tag, count, created_at): TagRow) -> TriageResult<Tag> {
    Ok(Tag {
        tag,
        count: count.max(0) as u64,
        created_at: parse_datetime(&created_at)?,
    })
}
