//! User-driven triage transitions on a single group.
//!
//! Single-statement transitions scope the `UPDATE` by id and project and
//! treat zero affected rows as not-found. Multi-statement ones (tag, untag,
//! comment, mark-seen) expect to run inside an immediate transaction and
//! check existence first.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use triage_core::errors::TriageResult;
use triage_core::identity::fold_case;
use triage_core::models::{Comment, UserRef};
use triage_core::TriageError;

use super::group_crud::ensure_group;
use super::tag_ops;
use crate::map_sqlite_err;

/// Attach `tag`. The catalog counter moves only when the tag was not
/// already on the group. Returns whether it was newly attached.
pub fn attach_tag(
    conn: &Connection,
    project: &str,
    group_id: &str,
    tag: &str,
) -> TriageResult<bool> {
    ensure_group(conn, project, group_id)?;
    let inserted = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO group_tags (group_id, tag, tag_folded) VALUES (?1, ?2, ?3)",
        )
        .and_then(|mut stmt| stmt.execute(params![group_id, tag, fold_case(tag)]))
        .map_err(|e| map_sqlite_err("attach tag", e))?;
    if inserted > 0 {
        tag_ops::increment(conn, tag)?;
    }
    Ok(inserted > 0)
}

/// Detach `tag`. Returns whether it was present.
pub fn detach_tag(
    conn: &Connection,
    project: &str,
    group_id: &str,
    tag: &str,
) -> TriageResult<bool> {
    ensure_group(conn, project, group_id)?;
    let deleted = conn
        .prepare_cached("DELETE FROM group_tags WHERE group_id = ?1 AND tag = ?2")
        .and_then(|mut stmt| stmt.execute(params![group_id, tag]))
        .map_err(|e| map_sqlite_err("detach tag", e))?;
    if deleted > 0 {
        tag_ops::decrement(conn, tag)?;
    }
    Ok(deleted > 0)
}

pub fn add_comment(
    conn: &Connection,
    project: &str,
    group_id: &str,
    author: &UserRef,
    text: &str,
    created_at: DateTime<Utc>,
) -> TriageResult<Comment> {
    ensure_group(conn, project, group_id)?;
    conn.prepare_cached(
        "INSERT INTO group_comments (group_id, author, body, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![group_id, author.as_str(), text, created_at.to_rfc3339()])
    })
    .map_err(|e| map_sqlite_err("add comment", e))?;
    Ok(Comment {
        author: author.clone(),
        text: text.to_string(),
        created_at,
    })
}

/// Returns true when `user` had not seen the group before.
pub fn mark_seen(
    conn: &Connection,
    project: &str,
    group_id: &str,
    user: &UserRef,
) -> TriageResult<bool> {
    ensure_group(conn, project, group_id)?;
    let inserted = conn
        .prepare_cached("INSERT OR IGNORE INTO group_seen_by (group_id, user_ref) VALUES (?1, ?2)")
        .and_then(|mut stmt| stmt.execute(params![group_id, user.as_str()]))
        .map_err(|e| map_sqlite_err("mark seen", e))?;
    Ok(inserted > 0)
}

/// Set or clear `claimed_by`.
pub fn set_claim(
    conn: &Connection,
    project: &str,
    group_id: &str,
    user: Option<&UserRef>,
) -> TriageResult<()> {
    update_user_column(conn, "claimed_by", project, group_id, user)
}

/// Set or clear `hidden_by`.
pub fn set_hidden(
    conn: &Connection,
    project: &str,
    group_id: &str,
    user: Option<&UserRef>,
) -> TriageResult<()> {
    update_user_column(conn, "hidden_by", project, group_id, user)
}

fn update_user_column(
    conn: &Connection,
    column: &'static str,
    project: &str,
    group_id: &str,
    user: Option<&UserRef>,
) -> TriageResult<()> {
    let sql = format!("UPDATE error_groups SET {column} = ?1 WHERE id = ?2 AND project = ?3");
    let changed = conn
        .prepare_cached(&sql)
        .and_then(|mut stmt| stmt.execute(params![user.map(UserRef::as_str), group_id, project]))
        .map_err(|e| map_sqlite_err(column, e))?;
    if changed == 0 {
        return Err(TriageError::GroupNotFound {
            id: group_id.to_string(),
        });
    }
    Ok(())
}
