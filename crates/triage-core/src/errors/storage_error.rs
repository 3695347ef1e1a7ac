/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    /// The database is busy, locked, or cannot be opened. Safe to retry.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// The update/insert loop for one fingerprint ran out of attempts.
    #[error("upsert conflict on {fingerprint} after {attempts} attempts")]
    UpsertConflict { fingerprint: String, attempts: u32 },
}
