//! v002: bounded per-fingerprint log of raw occurrences.

use rusqlite::Connection;

use triage_core::errors::TriageResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TriageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS occurrences (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            fingerprint TEXT NOT NULL,
            timestamp   REAL NOT NULL,
            message     TEXT NOT NULL,
            file        TEXT,
            line        INTEGER,
            context     TEXT NOT NULL DEFAULT '{}',
            backtrace   TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_occurrences_fingerprint_ts
            ON occurrences(fingerprint, timestamp);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
