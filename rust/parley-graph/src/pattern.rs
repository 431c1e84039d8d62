//! Pattern syntax.
//!
//! A pattern is a whitespace separated sequence of:
//!
//! | Spelling    | Token                        | Matches                    |
//! |-------------|------------------------------|----------------------------|
//! | `WORD`      | [`PatternToken::Literal`]    | that word, case-insensitive |
//! | `BOT_NAME`  | [`PatternToken::BotName`]    | the bot's configured name  |
//! | `*` or `_`  | [`PatternToken::Restrictive`] | one or more tokens        |
//! | `^` or `#`  | [`PatternToken::Permissive`] | zero or more tokens        |
//!
//! Literal words must be alphanumeric; patterns are written in normalized
//! form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::key::Segment;

pub const BOT_NAME: &str = "BOT_NAME";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternToken {
    /// An upper-cased word.
    Literal(String),
    BotName,
    Restrictive,
    Permissive,
}

impl PatternToken {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PatternToken::Restrictive | PatternToken::Permissive)
    }

    fn parse(word: &str) -> Option<Self> {
        match word {
            "*" | "_" => Some(PatternToken::Restrictive),
            "^" | "#" => Some(PatternToken::Permissive),
            BOT_NAME => Some(PatternToken::BotName),
            _ if word.chars().all(char::is_alphanumeric) => {
                Some(PatternToken::Literal(word.to_uppercase()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PatternToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternToken::Literal(word) => f.write_str(word),
            PatternToken::BotName => f.write_str(BOT_NAME),
            PatternToken::Restrictive => f.write_str("*"),
            PatternToken::Permissive => f.write_str("^"),
        }
    }
}

/// A parsed pattern for one segment of a rule.
///
/// An empty pattern is legal here; whether it is acceptable depends on the
/// segment it is used for, see [`MatchPath`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    tokens: Vec<PatternToken>,
}

impl Pattern {
    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn wildcard_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_wildcard()).count()
    }

    /// `true` when two wildcards follow each other with nothing in between.
    pub fn has_adjacent_wildcards(&self) -> bool {
        self.tokens
            .windows(2)
            .any(|pair| pair[0].is_wildcard() && pair[1].is_wildcard())
    }

    /// The pattern stored for a rule that places no constraint on a segment.
    pub fn any() -> Self {
        Pattern {
            tokens: vec![PatternToken::Restrictive],
        }
    }
}

impl FromStr for Pattern {
    type Err = GraphError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tokens = text
            .split_whitespace()
            .map(|word| {
                PatternToken::parse(word).ok_or_else(|| GraphError::InvalidPatternSyntax {
                    pattern: text.to_string(),
                    reason: format!("'{word}' is neither a word nor a wildcard"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pattern { tokens })
    }
}

impl TryFrom<String> for Pattern {
    type Error = GraphError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in &self.tokens {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
            first = false;
        }
        Ok(())
    }
}

/// The full path a rule occupies: pattern, context and topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchPath {
    pub pattern: Pattern,
    pub context: Pattern,
    pub topic: Pattern,
}

impl MatchPath {
    /// Assemble a path, storing an empty context or topic as `*`.
    pub fn new(pattern: Pattern, context: Pattern, topic: Pattern) -> Self {
        MatchPath {
            pattern,
            context: if context.is_empty() { Pattern::any() } else { context },
            topic: if topic.is_empty() { Pattern::any() } else { topic },
        }
    }

    /// Parse all three segments from text.
    pub fn parse(pattern: &str, context: &str, topic: &str) -> GraphResult<Self> {
        Ok(Self::new(pattern.parse()?, context.parse()?, topic.parse()?))
    }

    pub fn segment(&self, segment: Segment) -> &Pattern {
        match segment {
            Segment::Pattern => &self.pattern,
            Segment::Context => &self.context,
            Segment::Topic => &self.topic,
        }
    }

    /// Check the structural rules a path must satisfy before insertion.
    pub fn validate(&self, allow_adjacent_wildcards: bool) -> GraphResult<()> {
        if self.pattern.is_empty() {
            return Err(GraphError::InvalidPatternSyntax {
                pattern: self.to_string(),
                reason: "the input pattern is empty".to_string(),
            });
        }
        if !allow_adjacent_wildcards {
            if let Some(segment) = Segment::ALL
                .into_iter()
                .find(|s| self.segment(*s).has_adjacent_wildcards())
            {
                return Err(GraphError::InvalidPatternSyntax {
                    pattern: self.to_string(),
                    reason: format!("adjacent wildcards in the {segment}"),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for MatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <that> {} <topic> {}", self.pattern, self.context, self.topic)
    }
}
