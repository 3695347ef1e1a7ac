/// Input rejected before any store mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("malformed report: {0}")]
    Malformed(String),

    #[error("tag must not be empty")]
    EmptyTag,

    #[error("tag is {length} characters, maximum is {max}")]
    TagTooLong { length: usize, max: usize },

    #[error("comment must not be empty")]
    EmptyComment,
}
