//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use triage_core::config::StorageConfig;
use triage_core::errors::TriageResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` in in-memory mode: a second in-memory connection would be a
    /// separate, empty database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open the writer for the given database file. Readers are opened
    /// separately, once migrations have created the schema.
    pub fn open_writer(path: &Path, config: &StorageConfig) -> TriageResult<Self> {
        let writer = WriteConnection::open(path, config.busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers: None,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool (for testing). All reads go through the writer.
    pub fn open_in_memory(config: &StorageConfig) -> TriageResult<Self> {
        let writer = WriteConnection::open_in_memory(config.busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers: None,
            db_path: None,
        })
    }

    /// Attach the read pool. No-op in in-memory mode.
    pub fn open_readers(&mut self, config: &StorageConfig) -> TriageResult<()> {
        if let Some(path) = &self.db_path {
            self.readers = Some(ReadPool::open(path, config)?);
        }
        Ok(())
    }
}
