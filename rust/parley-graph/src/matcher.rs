//! Depth-first search with wildcard backtracking.

use std::collections::HashSet;
use std::ops::Range;

use parley_normalize::Token;

use crate::graph::{Consumption, Node, NodeId, PatternGraph, RuleId};
use crate::key::{MatchKey, Segment};

/// Token spans bound by the wildcards of a match.
///
/// Spans are kept per segment in pattern order and index into the
/// corresponding segment of the [`MatchKey`] that was looked up. A permissive
/// wildcard that matched nothing has an empty span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    spans: [Vec<Range<usize>>; 3],
}

impl Captures {
    /// All spans captured in `segment`.
    pub fn spans(&self, segment: Segment) -> &[Range<usize>] {
        &self.spans[segment.index()]
    }

    /// The span of the `index`-th wildcard of `segment`, counting from 1.
    pub fn span(&self, segment: Segment, index: usize) -> Option<Range<usize>> {
        index
            .checked_sub(1)
            .and_then(|i| self.spans(segment).get(i))
            .cloned()
    }

    /// The tokens bound by the `index`-th wildcard of `segment`, counting
    /// from 1.
    pub fn tokens<'k>(&self, key: &'k MatchKey, segment: Segment, index: usize) -> Option<&'k [Token]> {
        let span = self.span(segment, index)?;
        key.segment(segment).get(span)
    }
}

/// The winning rule of a lookup.
#[derive(Debug, Clone)]
pub struct Match<'g, T> {
    pub id: RuleId,
    pub rule: &'g T,
    pub captures: Captures,
}

pub(crate) struct Search<'g, 'k, T> {
    graph: &'g PatternGraph<T>,
    segments: [&'k [Token]; 3],
    bot_name: &'k [Token],
    consumption: Consumption,
    captures: [Vec<Range<usize>>; 3],
    /// `(node, segment, pos)` states known to reach no rule.
    failed: HashSet<(NodeId, usize, usize)>,
}

impl<'g, 'k, T> Search<'g, 'k, T> {
    pub(crate) fn new(graph: &'g PatternGraph<T>, key: &'k MatchKey, bot_name: &'k [Token]) -> Self {
        Search {
            graph,
            segments: [key.pattern(), key.context(), key.topic()],
            bot_name,
            consumption: graph.options().consumption,
            captures: Default::default(),
            failed: HashSet::new(),
        }
    }

    pub(crate) fn run(mut self) -> Option<Match<'g, T>> {
        let id = self.walk(self.graph.root(), 0, 0)?;
        let rule = self.graph.get(id)?;
        Some(Match {
            id,
            rule,
            captures: Captures {
                spans: self.captures,
            },
        })
    }

    /// Continue from `node` with `pos` tokens of `segment` consumed.
    ///
    /// On success the capture stack holds exactly the spans of the winning
    /// path; on failure it is left as it was found. Whether a state succeeds
    /// does not depend on the captures above it, so a failed state is never
    /// explored twice.
    fn walk(&mut self, id: NodeId, segment: usize, pos: usize) -> Option<RuleId> {
        if self.failed.contains(&(id, segment, pos)) {
            return None;
        }
        let found = self.explore(id, segment, pos);
        if found.is_none() {
            self.failed.insert((id, segment, pos));
        }
        found
    }

    fn explore(&mut self, id: NodeId, segment: usize, pos: usize) -> Option<RuleId> {
        let graph = self.graph;
        let node = graph.node(id);
        let tokens = self.segments[segment];

        if pos == tokens.len() {
            if let Some(found) = self.finish(node, segment) {
                return Some(found);
            }
        } else {
            if let Some(&child) = node.literals.get(&tokens[pos].value) {
                if let Some(found) = self.walk(child, segment, pos + 1) {
                    return Some(found);
                }
            }

            if let Some(child) = node.bot_name {
                if let Some(end) = self.bot_name_end(segment, pos) {
                    if let Some(found) = self.walk(child, segment, end) {
                        return Some(found);
                    }
                }
            }

            if let Some(child) = node.restrictive {
                if let Some(found) = self.wildcard(child, segment, pos, 1) {
                    return Some(found);
                }
            }
        }

        node.permissive
            .and_then(|child| self.wildcard(child, segment, pos, 0))
    }

    /// The segment is exhausted: cross into the next one, or stop at a rule.
    fn finish(&mut self, node: &Node, segment: usize) -> Option<RuleId> {
        if segment + 1 < self.segments.len() {
            node.separator
                .and_then(|next| self.walk(next, segment + 1, 0))
        } else {
            node.rule
        }
    }

    /// Where the bot's name ends if it starts at `pos`.
    fn bot_name_end(&self, segment: usize, pos: usize) -> Option<usize> {
        let end = pos + self.bot_name.len();
        let window = self.segments[segment].get(pos..end)?;
        let matches = !self.bot_name.is_empty()
            && window
                .iter()
                .zip(self.bot_name)
                .all(|(token, name)| token.value == name.value);
        matches.then_some(end)
    }

    /// Bind a wildcard of at least `min` tokens at `pos` and continue.
    fn wildcard(&mut self, child: NodeId, segment: usize, pos: usize, min: usize) -> Option<RuleId> {
        let remaining = self.segments[segment].len() - pos;
        if remaining < min {
            return None;
        }

        let spans: Vec<usize> = match self.consumption {
            Consumption::Greedy => (min..=remaining).rev().collect(),
            Consumption::Lazy => (min..=remaining).collect(),
        };

        for span in spans {
            self.captures[segment].push(pos..pos + span);
            if let Some(found) = self.walk(child, segment, pos + span) {
                return Some(found);
            }
            self.captures[segment].pop();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DuplicatePolicy, GraphOptions};
    use crate::pattern::MatchPath;
    use parley_normalize::join_original;
    use pretty_assertions::assert_eq;

    fn tokens(text: &str) -> Vec<Token> {
        text.split_whitespace().map(Token::new).collect()
    }

    fn key(pattern: &str, context: &str, topic: &str) -> MatchKey {
        MatchKey::new(tokens(pattern), tokens(context), tokens(topic))
    }

    fn graph(rules: &[(&str, &str, &str, &'static str)]) -> PatternGraph<&'static str> {
        graph_with(GraphOptions::default(), rules)
    }

    fn graph_with(
        options: GraphOptions,
        rules: &[(&str, &str, &str, &'static str)],
    ) -> PatternGraph<&'static str> {
        let mut graph = PatternGraph::with_options(options);
        for (pattern, context, topic, name) in rules {
            let path = MatchPath::parse(pattern, context, topic).unwrap();
            graph.insert(&path, *name, DuplicatePolicy::Overwrite).unwrap();
        }
        graph
    }

    fn find(graph: &PatternGraph<&'static str>, key: &MatchKey) -> Option<&'static str> {
        graph.find(key, &tokens("Alice")).map(|found| *found.rule)
    }

    fn capture(graph: &PatternGraph<&'static str>, key: &MatchKey, segment: Segment, index: usize) -> String {
        let found = graph.find(key, &[]).unwrap();
        join_original(found.captures.tokens(key, segment, index).unwrap())
    }

    #[test]
    fn literal_beats_wildcards() {
        let graph = graph(&[
            ("I LIKE ^", "", "", "permissive"),
            ("I LIKE *", "", "", "restrictive"),
            ("I LIKE CATS", "", "", "literal"),
        ]);
        assert_eq!(find(&graph, &key("i like cats", "", "")), Some("literal"));
        assert_eq!(find(&graph, &key("i like dogs", "", "")), Some("restrictive"));
        assert_eq!(find(&graph, &key("i like", "", "")), Some("permissive"));
    }

    #[test]
    fn bot_name_ranks_between_literal_and_wildcards() {
        let literal = graph(&[
            ("HELLO *", "", "", "star"),
            ("HELLO BOT_NAME", "", "", "name"),
            ("HELLO ALICE", "", "", "literal"),
        ]);
        assert_eq!(find(&literal, &key("hello alice", "", "")), Some("literal"));

        let named = graph(&[("HELLO *", "", "", "star"), ("HELLO BOT_NAME", "", "", "name")]);
        assert_eq!(find(&named, &key("hello alice", "", "")), Some("name"));
        assert_eq!(find(&named, &key("hello bob", "", "")), Some("star"));
        assert_eq!(named.find(&key("hello alice", "", ""), &[]).map(|m| *m.rule), Some("star"));
    }

    #[test]
    fn backtracks_out_of_a_failed_literal_branch() {
        let graph = graph(&[("HELLO THERE FRIEND", "", "", "literal"), ("HELLO *", "", "", "star")]);
        assert_eq!(find(&graph, &key("hello there", "", "")), Some("star"));
    }

    #[test]
    fn wildcard_in_the_middle() {
        let graph = graph(&[("MY * IS *", "", "", "rule")]);
        let key = key("my favourite colour is deep blue", "", "");
        assert_eq!(capture(&graph, &key, Segment::Pattern, 1), "favourite colour");
        assert_eq!(capture(&graph, &key, Segment::Pattern, 2), "deep blue");
    }

    #[test]
    fn greedy_and_lazy_consumption_differ() {
        let rules = [("* IS *", "", "", "rule")];
        let key = key("the sky is blue is it", "", "");

        let greedy = graph(&rules);
        assert_eq!(capture(&greedy, &key, Segment::Pattern, 1), "the sky is blue");
        assert_eq!(capture(&greedy, &key, Segment::Pattern, 2), "it");

        let lazy = graph_with(
            GraphOptions {
                consumption: Consumption::Lazy,
                ..GraphOptions::default()
            },
            &rules,
        );
        assert_eq!(capture(&lazy, &key, Segment::Pattern, 1), "the sky");
        assert_eq!(capture(&lazy, &key, Segment::Pattern, 2), "blue is it");
    }

    #[test]
    fn permissive_wildcard_can_match_nothing() {
        let graph = graph(&[("HELLO ^", "", "", "rule")]);
        let key = key("hello", "", "");
        let found = graph.find(&key, &[]).unwrap();
        assert_eq!(found.captures.span(Segment::Pattern, 1), Some(1..1));
        assert_eq!(found.captures.tokens(&key, Segment::Pattern, 1), Some(&[][..]));
    }

    #[test]
    fn restrictive_wildcard_needs_a_token() {
        let graph = graph(&[("HELLO *", "", "", "rule")]);
        assert_eq!(find(&graph, &key("hello", "", "")), None);
    }

    #[test]
    fn context_and_topic_constrain_the_match() {
        let graph = graph(&[
            ("YES", "", "", "plain"),
            ("YES", "DO YOU LIKE *", "", "context"),
            ("YES", "", "CATS", "topic"),
        ]);
        assert_eq!(find(&graph, &key("yes", "", "")), Some("plain"));
        assert_eq!(find(&graph, &key("yes", "do you like cheese", "")), Some("context"));
        assert_eq!(find(&graph, &key("yes", "", "cats")), Some("topic"));
        assert_eq!(find(&graph, &key("yes", "hello", "dogs")), Some("plain"));

        let key = key("yes", "do you like strong cheese", "");
        assert_eq!(capture(&graph, &key, Segment::Context, 1), "strong cheese");
    }

    #[test]
    fn empty_context_matches_star_through_the_placeholder() {
        let graph = graph(&[("HI", "*", "*", "rule")]);
        let key = key("hi", "", "");
        assert_eq!(capture(&graph, &key, Segment::Topic, 1), "UNDEFINED");
    }

    #[test]
    fn separator_is_tried_before_an_empty_permissive_span() {
        let graph = graph(&[("A ^", "", "", "permissive"), ("A", "", "", "exact")]);
        assert_eq!(find(&graph, &key("a", "", "")), Some("exact"));
    }

    #[test]
    fn no_rule_means_no_match() {
        let graph = graph(&[("HELLO", "", "", "rule")]);
        assert_eq!(find(&graph, &key("goodbye", "", "")), None);
        assert_eq!(find(&graph, &key("", "", "")), None);
    }

    #[test]
    fn failed_states_are_not_explored_again() {
        let graph = graph(&[("* A * A * A * A * A * A * B", "", "", "rule")]);
        let input = vec!["a"; 200].join(" ");

        let started = std::time::Instant::now();
        assert_eq!(find(&graph, &key(&input, "", "")), None);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        let input = format!("{input} b");
        assert_eq!(find(&graph, &key(&input, "", "")), Some("rule"));
    }

    #[test]
    fn capture_index_is_one_based() {
        let captures = Captures::default();
        assert_eq!(captures.span(Segment::Pattern, 0), None);
        assert_eq!(captures.span(Segment::Pattern, 1), None);
    }
}
