use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Global tag catalog entry: how many groups currently carry `tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub count: u64,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Trim a user-supplied label and check it against the length limit
    /// (counted in characters, not bytes).
    pub fn validate_label(raw: &str, max_length: usize) -> Result<&str, ValidationError> {
        let label = raw.trim();
        if label.is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        let length = label.chars().count();
        if length > max_length {
            return Err(ValidationError::TagTooLong {
                length,
                max: max_length,
            });
        }
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_TAG_LENGTH;

    #[test]
    fn label_is_trimmed() {
        assert_eq!(Tag::validate_label("  flaky ", MAX_TAG_LENGTH).unwrap(), "flaky");
    }

    #[test]
    fn thirty_chars_is_the_limit() {
        let ok = "x".repeat(30);
        assert!(Tag::validate_label(&ok, MAX_TAG_LENGTH).is_ok());
        let long = "x".repeat(31);
        assert_eq!(
            Tag::validate_label(&long, MAX_TAG_LENGTH),
            Err(ValidationError::TagTooLong { length: 31, max: 30 })
        );
    }

    #[test]
    fn multibyte_counts_characters() {
        let label = "é".repeat(30);
        assert!(Tag::validate_label(&label, MAX_TAG_LENGTH).is_ok());
    }

    #[test]
    fn blank_label_is_rejected() {
        assert_eq!(Tag::validate_label("   ", MAX_TAG_LENGTH), Err(ValidationError::EmptyTag));
    }
}
