//! Error types for substitution tables.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("substitution key must contain at least one word")]
    EmptyKey,

    #[error("substitution key '{key}' contains characters that never appear inside a word")]
    InvalidKey { key: String },
}
