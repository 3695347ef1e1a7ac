mod storage_error;
mod triage_error;
mod validation_error;

pub use storage_error::StorageError;
pub use triage_error::{TriageError, TriageResult};
pub use validation_error::ValidationError;
