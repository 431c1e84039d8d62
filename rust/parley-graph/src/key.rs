//! Lookup keys.

use std::fmt;

use parley_normalize::{Token, join_values};
use serde::{Deserialize, Serialize};

/// The token that stands in for an empty context or topic at lookup time.
///
/// A rule written with no context or topic is stored under `*`, which needs
/// at least one token to match.
pub const PLACEHOLDER: &str = "UNDEFINED";

/// One of the three segments of a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Pattern,
    Context,
    Topic,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Pattern, Segment::Context, Segment::Topic];

    pub(crate) fn index(self) -> usize {
        match self {
            Segment::Pattern => 0,
            Segment::Context => 1,
            Segment::Topic => 2,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Pattern => "pattern",
            Segment::Context => "context",
            Segment::Topic => "topic",
        };
        f.write_str(name)
    }
}

/// A normalized `(input, previous reply, topic)` triple to look up.
///
/// The key owns its tokens so that wildcard captures, which are ranges into
/// these segments, can be resolved after the lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchKey {
    segments: [Vec<Token>; 3],
}

impl MatchKey {
    /// Build a key, substituting [`PLACEHOLDER`] for an empty context or
    /// topic.
    pub fn new(pattern: Vec<Token>, context: Vec<Token>, topic: Vec<Token>) -> Self {
        MatchKey {
            segments: [pattern, or_placeholder(context), or_placeholder(topic)],
        }
    }

    pub fn segment(&self, segment: Segment) -> &[Token] {
        &self.segments[segment.index()]
    }

    pub fn pattern(&self) -> &[Token] {
        self.segment(Segment::Pattern)
    }

    pub fn context(&self) -> &[Token] {
        self.segment(Segment::Context)
    }

    pub fn topic(&self) -> &[Token] {
        self.segment(Segment::Topic)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <that> {} <topic> {}",
            join_values(self.pattern()),
            join_values(self.context()),
            join_values(self.topic())
        )
    }
}

fn or_placeholder(tokens: Vec<Token>) -> Vec<Token> {
    if tokens.is_empty() {
        vec![Token::new(PLACEHOLDER)]
    } else {
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_context_and_topic_become_placeholders() {
        let key = MatchKey::new(vec![Token::new("hi")], vec![], vec![]);
        assert_eq!(key.context(), &[Token::new(PLACEHOLDER)]);
        assert_eq!(key.topic(), &[Token::new(PLACEHOLDER)]);
        assert_eq!(key.to_string(), "HI <that> UNDEFINED <topic> UNDEFINED");
    }

    #[test]
    fn non_empty_segments_are_kept() {
        let key = MatchKey::new(
            vec![Token::new("yes")],
            vec![Token::new("do"), Token::new("you")],
            vec![Token::new("cats")],
        );
        assert_eq!(key.segment(Segment::Context).len(), 2);
        assert_eq!(key.topic()[0].original, "cats");
    }
}
