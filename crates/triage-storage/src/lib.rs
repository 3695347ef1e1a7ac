//! # triage-storage
//!
//! SQLite persistence layer for the triage engine.
//! Implements `IErrorGroupStorage` and `ITagCatalog`.
//! Single write connection + read pool (WAL mode).

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use rusqlite::ErrorCode;
use triage_core::errors::StorageError;
use triage_core::TriageError;

/// Helper to convert a string message into a TriageError::StorageError.
pub fn to_storage_err(msg: String) -> TriageError {
    TriageError::StorageError(StorageError::SqliteError { message: msg })
}

/// Classify a rusqlite error. Busy, locked and cannot-open become the
/// retryable `Unavailable`; everything else is a plain SQLite error.
pub fn map_sqlite_err(context: &str, e: rusqlite::Error) -> TriageError {
    let message = format!("{context}: {e}");
    let storage = match e.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
            StorageError::Unavailable { message }
        }
        _ => StorageError::SqliteError { message },
    };
    TriageError::StorageError(storage)
}

/// True when `e` is a UNIQUE / PRIMARY KEY constraint violation.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
