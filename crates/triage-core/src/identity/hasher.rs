//! Canonical identity tuple and its fingerprint.
//!
//! The fingerprint is `blake3` over a versioned, length-prefixed encoding of
//! (project, language, type, normalized message). Each field is written as an
//! 8-byte little-endian byte length followed by its UTF-8 bytes, so no field
//! value can forge a boundary. The encoding is part of the persisted contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::normalizer::normalize;
use crate::constants::FINGERPRINT_VERSION;
use crate::errors::ValidationError;

/// The ordered identity tuple. `message` is already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub project: String,
    pub language: String,
    pub error_type: String,
    pub message: String,
}

impl Identity {
    /// Canonical byte encoding hashed into the fingerprint.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let fields = [
            FINGERPRINT_VERSION,
            self.project.as_str(),
            self.language.as_str(),
            self.error_type.as_str(),
            self.message.as_str(),
        ];
        let capacity = fields.iter().map(|f| f.len() + 8).sum();
        let mut buf = Vec::with_capacity(capacity);
        for field in fields {
            buf.extend_from_slice(&(field.len() as u64).to_le_bytes());
            buf.extend_from_slice(field.as_bytes());
        }
        buf
    }
}

/// Build the identity tuple, normalizing the message.
pub fn identity_of(project: &str, language: &str, error_type: &str, message: &str) -> Identity {
    Identity {
        project: project.to_string(),
        language: language.to_string(),
        error_type: error_type.to_string(),
        message: normalize(message),
    }
}

/// Digest an identity into its fingerprint.
pub fn fingerprint_of(identity: &Identity) -> Fingerprint {
    Fingerprint(blake3::hash(&identity.canonical_bytes()).to_hex().to_string())
}

/// Lowercase hex blake3 digest identifying one error group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

/// Hex length of a fingerprint (32-byte digest).
pub const FINGERPRINT_HEX_LEN: usize = 64;

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Fingerprint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == FINGERPRINT_HEX_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(ValidationError::InvalidField {
                field: "fingerprint",
                reason: format!("expected {FINGERPRINT_HEX_LEN} lowercase hex characters"),
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(project: &str, language: &str, error_type: &str, message: &str) -> Fingerprint {
        fingerprint_of(&identity_of(project, language, error_type, message))
    }

    #[test]
    fn interpolated_values_share_fingerprint() {
        assert_eq!(
            fp("p1", "py", "KeyError", "User 42 not found"),
            fp("p1", "py", "KeyError", "User 99 not found"),
        );
        assert_eq!(
            fp("p1", "py", "ValueError", "invalid literal '42'"),
            fp("p1", "py", "ValueError", "invalid literal 'abc'"),
        );
    }

    #[test]
    fn identity_components_change_fingerprint() {
        let base = fp("p1", "py", "KeyError", "missing");
        assert_ne!(base, fp("p2", "py", "KeyError", "missing"));
        assert_ne!(base, fp("p1", "rb", "KeyError", "missing"));
        assert_ne!(base, fp("p1", "py", "IndexError", "missing"));
        assert_ne!(base, fp("p1", "py", "KeyError", "absent"));
    }

    #[test]
    fn field_boundaries_cannot_be_forged() {
        // Naive "a:b" joining would make these collide.
        assert_ne!(fp("a:b", "c", "T", "m"), fp("a", "b:c", "T", "m"));
        assert_ne!(fp("ab", "", "T", "m"), fp("a", "b", "T", "m"));
    }

    #[test]
    fn fingerprint_is_stable_hex() {
        let first = fp("p1", "py", "ValueError", "boom");
        let second = fp("p1", "py", "ValueError", "boom");
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), FINGERPRINT_HEX_LEN);
        assert_eq!(first.as_str().parse::<Fingerprint>().unwrap(), first);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("xyz".parse::<Fingerprint>().is_err());
        assert!("A".repeat(FINGERPRINT_HEX_LEN).parse::<Fingerprint>().is_err());
    }

    #[test]
    fn canonical_bytes_are_length_prefixed() {
        let identity = identity_of("p", "py", "E", "m");
        let bytes = identity.canonical_bytes();
        let tag_len = FINGERPRINT_VERSION.len() as u64;
        assert_eq!(&bytes[..8], &tag_len.to_le_bytes());
        assert_eq!(bytes.len(), FINGERPRINT_VERSION.len() + 1 + 2 + 1 + 1 + 5 * 8);
    }
}
