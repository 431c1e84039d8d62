//! The arena-backed pattern trie.

use std::collections::HashMap;

use parley_normalize::Token;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::key::MatchKey;
use crate::matcher::{Match, Search};
use crate::pattern::{MatchPath, PatternToken};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// Index of a stored rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What happens when a rule is inserted at a path that already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later rule replaces the earlier one.
    #[default]
    Overwrite,
    /// The later rule is refused and the graph is left untouched.
    Reject,
}

/// The order in which a wildcard tries its possible spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consumption {
    /// Longest span first.
    #[default]
    Greedy,
    /// Shortest span first.
    Lazy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    pub consumption: Consumption,
    /// Accept patterns in which two wildcards are adjacent.
    pub adjacent_wildcards: bool,
}

/// Outcome of a successful [`PatternGraph::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Added(RuleId),
    Replaced(RuleId),
}

impl Insertion {
    pub fn id(self) -> RuleId {
        match self {
            Insertion::Added(id) | Insertion::Replaced(id) => id,
        }
    }
}

/// One step of a stored path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edge<'a> {
    Literal(&'a str),
    BotName,
    Restrictive,
    Permissive,
    Separator,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct Node {
    pub(crate) literals: HashMap<String, NodeId>,
    pub(crate) bot_name: Option<NodeId>,
    pub(crate) restrictive: Option<NodeId>,
    pub(crate) permissive: Option<NodeId>,
    pub(crate) separator: Option<NodeId>,
    pub(crate) rule: Option<RuleId>,
}

impl Node {
    fn child(&self, edge: &Edge<'_>) -> Option<NodeId> {
        match edge {
            Edge::Literal(word) => self.literals.get(*word).copied(),
            Edge::BotName => self.bot_name,
            Edge::Restrictive => self.restrictive,
            Edge::Permissive => self.permissive,
            Edge::Separator => self.separator,
        }
    }

    fn set_child(&mut self, edge: &Edge<'_>, id: NodeId) {
        match edge {
            Edge::Literal(word) => {
                self.literals.insert((*word).to_string(), id);
            }
            Edge::BotName => self.bot_name = Some(id),
            Edge::Restrictive => self.restrictive = Some(id),
            Edge::Permissive => self.permissive = Some(id),
            Edge::Separator => self.separator = Some(id),
        }
    }
}

/// A trie over `(pattern, context, topic)` paths with a value `T` stored at
/// each complete path.
///
/// The graph is mutated only through [`PatternGraph::insert`]; lookups borrow
/// it immutably and may run concurrently behind a read lock.
#[derive(Debug, Clone)]
pub struct PatternGraph<T> {
    nodes: Vec<Node>,
    rules: Vec<T>,
    options: GraphOptions,
}

impl<T> Default for PatternGraph<T> {
    fn default() -> Self {
        Self::with_options(GraphOptions::default())
    }
}

impl<T> PatternGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GraphOptions) -> Self {
        PatternGraph {
            nodes: vec![Node::default()],
            rules: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    /// Number of stored rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: RuleId) -> Option<&T> {
        self.rules.get(id.0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Store `value` at `path`.
    ///
    /// The path is validated first. Under [`DuplicatePolicy::Reject`] an
    /// existing rule at the same path makes the insertion fail before any
    /// node is created.
    pub fn insert(
        &mut self,
        path: &MatchPath,
        value: T,
        policy: DuplicatePolicy,
    ) -> GraphResult<Insertion> {
        path.validate(self.options.adjacent_wildcards)?;
        let edges = edges(path);

        if let Some(existing) = self.walk_exact(&edges).and_then(|id| self.node(id).rule) {
            return match policy {
                DuplicatePolicy::Reject => Err(GraphError::DuplicateRule {
                    path: path.to_string(),
                }),
                DuplicatePolicy::Overwrite => {
                    tracing::debug!(%path, "replacing rule");
                    self.rules[existing.0] = value;
                    Ok(Insertion::Replaced(existing))
                }
            };
        }

        let mut current = self.root();
        for edge in &edges {
            current = match self.node(current).child(edge) {
                Some(next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(Node::default());
                    self.nodes[current.0].set_child(edge, next);
                    next
                }
            };
        }

        let id = RuleId(self.rules.len());
        self.rules.push(value);
        self.nodes[current.0].rule = Some(id);
        Ok(Insertion::Added(id))
    }

    /// The value stored at exactly `path`, if any.
    ///
    /// Wildcards in `path` are compared as wildcards, not expanded.
    pub fn get_exact(&self, path: &MatchPath) -> Option<&T> {
        self.walk_exact(&edges(path))
            .and_then(|id| self.node(id).rule)
            .and_then(|id| self.get(id))
    }

    /// Find the best rule for `key`.
    ///
    /// `bot_name` is the normalized form of the bot's name, matched wherever
    /// a pattern says `BOT_NAME`; when it is empty those patterns never
    /// match.
    pub fn find(&self, key: &MatchKey, bot_name: &[Token]) -> Option<Match<'_, T>> {
        Search::new(self, key, bot_name).run()
    }

    fn walk_exact(&self, edges: &[Edge<'_>]) -> Option<NodeId> {
        edges
            .iter()
            .try_fold(self.root(), |node, edge| self.node(node).child(edge))
    }
}

fn edges(path: &MatchPath) -> Vec<Edge<'_>> {
    let mut edges = Vec::new();
    let segments = [&path.pattern, &path.context, &path.topic];
    for (index, pattern) in segments.into_iter().enumerate() {
        if index > 0 {
            edges.push(Edge::Separator);
        }
        edges.extend(pattern.tokens().iter().map(|token| match token {
            PatternToken::Literal(word) => Edge::Literal(word.as_str()),
            PatternToken::BotName => Edge::BotName,
            PatternToken::Restrictive => Edge::Restrictive,
            PatternToken::Permissive => Edge::Permissive,
        }));
    }
    edges
}
