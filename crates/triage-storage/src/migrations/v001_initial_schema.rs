//! v001: schema_version, error_groups, per-group keyword/tag/comment/seen
//! tables, and the global tag catalog.

use rusqlite::Connection;

use triage_core::errors::TriageResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TriageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS error_groups (
            id          TEXT PRIMARY KEY,
            fingerprint TEXT NOT NULL UNIQUE,
            project     TEXT NOT NULL,
            language    TEXT NOT NULL,
            error_type  TEXT NOT NULL,
            type_folded TEXT NOT NULL,
            message     TEXT NOT NULL,
            file        TEXT,
            line        INTEGER,
            context     TEXT NOT NULL DEFAULT '{}',
            backtrace   TEXT NOT NULL DEFAULT '[]',
            first_seen  REAL NOT NULL,
            last_seen   REAL NOT NULL,
            count       INTEGER NOT NULL CHECK (count >= 1),
            claimed_by  TEXT,
            hidden_by   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_groups_project_last_seen
            ON error_groups(project, last_seen DESC);

        CREATE TABLE IF NOT EXISTS group_keywords (
            group_id TEXT NOT NULL REFERENCES error_groups(id) ON DELETE CASCADE,
            keyword  TEXT NOT NULL,
            PRIMARY KEY (group_id, keyword)
        ) WITHOUT ROWID;

        CREATE INDEX IF NOT EXISTS idx_group_keywords_keyword ON group_keywords(keyword);

        CREATE TABLE IF NOT EXISTS group_tags (
            seq        INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id   TEXT NOT NULL REFERENCES error_groups(id) ON DELETE CASCADE,
            tag        TEXT NOT NULL,
            tag_folded TEXT NOT NULL,
            UNIQUE (group_id, tag)
        );

        CREATE TABLE IF NOT EXISTS group_comments (
            seq        INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id   TEXT NOT NULL REFERENCES error_groups(id) ON DELETE CASCADE,
            author     TEXT NOT NULL,
            body       TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_group_comments_group ON group_comments(group_id, seq);

        CREATE TABLE IF NOT EXISTS group_seen_by (
            group_id TEXT NOT NULL REFERENCES error_groups(id) ON DELETE CASCADE,
            user_ref TEXT NOT NULL,
            PRIMARY KEY (group_id, user_ref)
        ) WITHOUT ROWID;

        CREATE TABLE IF NOT EXISTS tags (
            seq        INTEGER PRIMARY KEY AUTOINCREMENT,
            tag        TEXT NOT NULL UNIQUE,
            count      INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tags_count ON tags(count DESC, seq ASC);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
