use super::{StorageError, ValidationError};

/// Top-level error type for the triage engine.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("error group not found: {id}")]
    GroupNotFound { id: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl TriageError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageError(StorageError::Unavailable { .. }))
    }
}

/// Convenience type alias.
pub type TriageResult<T> = Result<T, TriageError>;
