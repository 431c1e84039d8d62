//! Tokens: the unit the pattern graph matches on.
//!
//! A token keeps two spellings: the folded `value` used for matching and the
//! `original` surface text, so that wildcard captures can be echoed back the
//! way the user typed them.

use std::fmt;

/// A single normalized word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Upper-cased matching form.
    pub value: String,
    /// The text as it appeared after substitution, before case folding.
    pub original: String,
}

impl Token {
    /// Build a token from surface text, folding it for matching.
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Token {
            value: original.to_uppercase(),
            original,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Join the matching forms of `tokens` with single spaces.
pub fn join_values(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join the surface forms of `tokens` with single spaces.
pub fn join_original(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.original.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
