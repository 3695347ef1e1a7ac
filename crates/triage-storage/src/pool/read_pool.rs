//! Read-only connections for list/search/lookup. WAL lets them run while
//! the writer holds its transaction.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use rusqlite::{Connection, OpenFlags};

use triage_core::config::StorageConfig;
use triage_core::errors::TriageResult;

use super::pragmas::apply_read_pragmas;
use crate::{map_sqlite_err, to_storage_err};

const MAX_READERS: usize = 8;

/// Fixed set of read-only connections.
pub struct ReadPool {
    slots: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `config.read_pool_size` readers (clamped to 1..=8) on `path`.
    /// The schema must already exist.
    pub fn open(path: &Path, config: &StorageConfig) -> TriageResult<Self> {
        let count = config.read_pool_size.clamp(1, MAX_READERS);
        let slots = (0..count)
            .map(|_| open_reader(path, config.busy_timeout_ms).map(Mutex::new))
            .collect::<TriageResult<Vec<_>>>()?;
        Ok(Self {
            slots,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on a reader. An idle connection is preferred; when all are
    /// busy, waits on the next one in rotation.
    pub fn with_conn<F, T>(&self, f: F) -> TriageResult<T>
    where
        F: FnOnce(&Connection) -> TriageResult<T>,
    {
        let conn = self.checkout()?;
        f(&conn)
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    fn checkout(&self) -> TriageResult<MutexGuard<'_, Connection>> {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        let n = self.slots.len();
        for offset in 0..n {
            match self.slots[(start + offset) % n].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(e)) => {
                    return Err(to_storage_err(format!("reader lock poisoned: {e}")))
                }
            }
        }
        self.slots[start % n]
            .lock()
            .map_err(|e| to_storage_err(format!("reader lock poisoned: {e}")))
    }
}

fn open_reader(path: &Path, busy_timeout_ms: u32) -> TriageResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| map_sqlite_err("open reader", e))?;
    apply_read_pragmas(&conn, busy_timeout_ms)?;
    Ok(conn)
}
