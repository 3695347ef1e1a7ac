//! Migration runner: version tracking, forward-only, transactional per migration.

mod v001_initial_schema;
mod v002_occurrence_log;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use triage_core::errors::{StorageError, TriageResult};
use triage_core::TriageError;

use crate::to_storage_err;

/// Latest schema version.
pub const LATEST_VERSION: u32 = 2;

type MigrationFn = fn(&Connection) -> TriageResult<()>;

const MIGRATIONS: [(u32, &str, MigrationFn); 2] = [
    (1, "initial_schema", v001_initial_schema::migrate),
    (2, "occurrence_log", v002_occurrence_log::migrate),
];

/// Get the current schema version from the database.
/// Returns 0 if the schema_version table doesn't exist yet.
pub fn current_version(conn: &Connection) -> TriageResult<u32> {
    let exists: bool = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version'")
        .and_then(|mut stmt| stmt.exists([]))
        .map_err(|e| to_storage_err(e.to_string()))?;

    if !exists {
        return Ok(0);
    }

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Run all pending migrations. Returns how many were applied by this call.
///
/// The version is re-read after `BEGIN IMMEDIATE`, so two processes opening
/// the same fresh file apply each migration exactly once between them.
pub fn run_migrations(conn: &Connection) -> TriageResult<u32> {
    let current = current_version(conn)?;
    if current >= LATEST_VERSION {
        debug!("database schema is up to date (v{current})");
        return Ok(0);
    }

    info!("running migrations: v{current} → v{LATEST_VERSION}");

    let mut applied = 0;
    for &(version, name, migrate_fn) in &MIGRATIONS {
        if version <= current {
            continue;
        }
        if apply_one(conn, version, name, migrate_fn)? {
            applied += 1;
        }
    }

    info!("applied {applied} migration(s), now at v{LATEST_VERSION}");
    Ok(applied)
}

fn apply_one(
    conn: &Connection,
    version: u32,
    name: &str,
    migrate_fn: MigrationFn,
) -> TriageResult<bool> {
    let failed = |reason: String| {
        TriageError::StorageError(StorageError::MigrationFailed { version, reason })
    };

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| failed(format!("begin transaction: {e}")))?;

    if current_version(&tx)? >= version {
        debug!("migration v{version:03} already applied by another connection");
        return Ok(false);
    }

    debug!("applying migration v{version:03}: {name}");
    if let Err(e) = migrate_fn(&tx) {
        warn!("migration v{version:03} failed: {e}, rolling back");
        return Err(failed(e.to_string()));
    }

    tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| failed(format!("record version: {e}")))?;
    tx.commit().map_err(|e| failed(format!("commit: {e}")))?;

    info!("applied migration v{version:03}: {name}");
    Ok(true)
}
