//! View listing and keyword search.

use std::collections::BTreeSet;

use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection};

use triage_core::errors::TriageResult;
use triage_core::identity::fold_case;
use triage_core::models::{ErrorGroup, UserRef, View};

use super::group_crud::{collect_groups, GROUP_COLUMNS};

const ORDER: &str = "ORDER BY g.last_seen DESC, g.rowid DESC";

/// Predicate selecting a view's groups. `?2` is the viewer, bound only
/// when [`View::uses_viewer`] is true.
fn view_predicate(view: View) -> &'static str {
    match view {
        View::Active => "g.hidden_by IS NULL",
        View::Hidden => "g.hidden_by IS NOT NULL",
        View::Seen => {
            "g.hidden_by IS NULL AND EXISTS (
                SELECT 1 FROM group_seen_by s WHERE s.group_id = g.id AND s.user_ref = ?2)"
        }
        View::Unseen => {
            "g.hidden_by IS NULL AND NOT EXISTS (
                SELECT 1 FROM group_seen_by s WHERE s.group_id = g.id AND s.user_ref = ?2)"
        }
        View::Mine => "g.hidden_by IS NULL AND g.claimed_by = ?2",
        View::Unclaimed => "g.hidden_by IS NULL AND g.claimed_by IS NULL",
    }
}

/// Groups of `project` in `view` for `viewer`, most recently seen first.
pub fn list_view(
    conn: &Connection,
    project: &str,
    view: View,
    viewer: &UserRef,
) -> TriageResult<Vec<ErrorGroup>> {
    let sql = format!(
        "SELECT {GROUP_COLUMNS} FROM error_groups g
         WHERE g.project = ?1 AND {} {ORDER}",
        view_predicate(view)
    );
    let viewer = viewer.as_str();
    let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(2);
    bind.push(&project);
    if view.uses_viewer() {
        bind.push(&viewer);
    }
    collect_groups(conn, &sql, params_from_iter(bind))
}

/// Split a query into distinct case-folded terms.
pub fn search_terms(query: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    query
        .split_whitespace()
        .map(fold_case)
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Groups of `project` matching any term, hidden ones included.
///
/// A term matches when it is a substring of the error type or of an
/// attached tag (both case-insensitive), or equals a keyword. A blank
/// query matches every group in the project.
pub fn search(conn: &Connection, project: &str, query: &str) -> TriageResult<Vec<ErrorGroup>> {
    let terms = search_terms(query);
    if terms.is_empty() {
        let sql =
            format!("SELECT {GROUP_COLUMNS} FROM error_groups g WHERE g.project = ?1 {ORDER}");
        return collect_groups(conn, &sql, [project]);
    }

    let clauses: Vec<String> = (0..terms.len())
        .map(|i| {
            let p = i + 2;
            format!(
                "(instr(g.type_folded, ?{p}) > 0
                  OR EXISTS (SELECT 1 FROM group_tags t
                             WHERE t.group_id = g.id AND instr(t.tag_folded, ?{p}) > 0)
                  OR EXISTS (SELECT 1 FROM group_keywords k
                             WHERE k.group_id = g.id AND k.keyword = ?{p}))"
            )
        })
        .collect();

    let sql = format!(
        "SELECT {GROUP_COLUMNS} FROM error_groups g
         WHERE g.project = ?1 AND ({}) {ORDER}",
        clauses.join(" OR ")
    );
    let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(terms.len() + 1);
    bind.push(&project);
    bind.extend(terms.iter().map(|t| t as &dyn ToSql));
    collect_groups(conn, &sql, params_from_iter(bind))
}
