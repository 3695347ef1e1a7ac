//! Message identity: normalization, canonical identity tuple, fingerprint,
//! and keyword extraction. All functions are pure and thread-safe.

pub mod hasher;
pub mod keywords;
pub mod normalizer;

pub use hasher::{fingerprint_of, identity_of, Fingerprint, Identity};
pub use keywords::{extract_keywords, fold_case};
pub use normalizer::normalize;
