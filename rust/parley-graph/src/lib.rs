//! # parley-graph
//!
//! A trie-shaped index over `(pattern, context, topic)` token triples.
//!
//! Every rule occupies one path through the graph:
//!
//! ```text
//! pattern tokens · SEP · context tokens · SEP · topic tokens → rule
//! ```
//!
//! Nodes live in an arena and refer to each other by index, so the graph has
//! a single owner and no reference cycles.
//!
//! ## Matching
//!
//! [`PatternGraph::find`] walks the three token streams depth first. At each
//! node the transitions are tried in a fixed order, and the first complete
//! path wins:
//!
//! 1. the literal token,
//! 2. the bot's name (`BOT_NAME` in a pattern),
//! 3. the restrictive wildcard `*` (one or more tokens),
//! 4. the permissive wildcard `^` (zero or more tokens).
//!
//! A wildcard tries its possible spans in the configured [`Consumption`]
//! order and backtracks to the next span when the rest of the path fails.
//! Every transition either consumes input or descends into the finite tree,
//! so lookup always terminates.
//!
//! ```
//! use parley_graph::{MatchKey, MatchPath, PatternGraph, DuplicatePolicy, Segment};
//! use parley_normalize::Token;
//!
//! let mut graph = PatternGraph::new();
//! graph.insert(&MatchPath::parse("I LIKE *", "", "").unwrap(), "wildcard", DuplicatePolicy::Overwrite).unwrap();
//! graph.insert(&MatchPath::parse("I LIKE CATS", "", "").unwrap(), "literal", DuplicatePolicy::Overwrite).unwrap();
//!
//! let input: Vec<Token> = ["i", "like", "cats"].into_iter().map(Token::new).collect();
//! let key = MatchKey::new(input, vec![], vec![]);
//! let found = graph.find(&key, &[]).unwrap();
//! assert_eq!(*found.rule, "literal");
//! ```

pub mod error;
pub mod graph;
pub mod key;
pub mod matcher;
pub mod pattern;

pub use error::{GraphError, GraphResult};
pub use graph::{Consumption, DuplicatePolicy, GraphOptions, Insertion, PatternGraph, RuleId};
pub use key::{MatchKey, PLACEHOLDER, Segment};
pub use matcher::{Captures, Match};
pub use pattern::{MatchPath, Pattern, PatternToken};
