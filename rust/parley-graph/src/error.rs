//! Error types for pattern parsing and rule insertion.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The pattern text cannot be turned into a legal token path.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPatternSyntax { pattern: String, reason: String },

    /// A rule with the same path exists and the policy refuses to replace it.
    #[error("a rule is already stored at {path}")]
    DuplicateRule { path: String },
}

pub type GraphResult<T> = Result<T, GraphError>;
