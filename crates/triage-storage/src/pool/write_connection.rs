//! Single write connection behind a mutex. Serialized writes within one
//! process; `BEGIN IMMEDIATE` serializes against other processes.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use triage_core::errors::TriageResult;

use super::pragmas::apply_pragmas;
use crate::{map_sqlite_err, to_storage_err};

/// A single write connection protected by a mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> TriageResult<Self> {
        let conn = Connection::open(path).map_err(|e| map_sqlite_err("open writer", e))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(busy_timeout_ms: u32) -> TriageResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| map_sqlite_err("open in-memory writer", e))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> TriageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| to_storage_err(format!("write lock poisoned: {e}")))
    }

    /// Run a single autocommitted statement (or read) on the writer.
    pub fn with_conn<F, T>(&self, f: F) -> TriageResult<T>
    where
        F: FnOnce(&Connection) -> TriageResult<T>,
    {
        let guard = self.lock()?;
        f(&guard)
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction. The write lock is
    /// taken at BEGIN, so no other connection can interleave. Commits on
    /// `Ok`, rolls back on `Err` (the transaction is dropped uncommitted).
    pub fn with_immediate_tx<F, T>(&self, f: F) -> TriageResult<T>
    where
        F: FnOnce(&Connection) -> TriageResult<T>,
    {
        let guard = self.lock()?;
        let tx = Transaction::new_unchecked(&guard, TransactionBehavior::Immediate)
            .map_err(|e| map_sqlite_err("begin immediate", e))?;
        let result = f(&tx)?;
        tx.commit().map_err(|e| map_sqlite_err("commit", e))?;
        Ok(result)
    }
}
