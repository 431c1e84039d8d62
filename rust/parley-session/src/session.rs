use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

/// The predicate that holds the session's topic.
pub const TOPIC: &str = "topic";

/// One answered sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub input: String,
    pub response: String,
}

/// The state of a single conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    predicates: BTreeMap<String, String>,
    /// Oldest first.
    history: VecDeque<Exchange>,
    history_limit: usize,
}

impl Session {
    pub fn new(id: impl Into<String>, history_limit: usize) -> Self {
        Session {
            id: id.into(),
            predicates: BTreeMap::new(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn predicate(&self, name: &str) -> Option<&str> {
        self.predicates.get(name).map(String::as_str)
    }

    /// The value of `name`, or `default` when it has never been set.
    pub fn predicate_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.predicate(name).unwrap_or(default)
    }

    pub fn set_predicate(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.predicates.insert(name.into(), value.into());
    }

    pub fn predicates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The current topic; empty when no topic has been set.
    pub fn topic(&self) -> &str {
        self.predicate_or(TOPIC, "")
    }

    /// Record an exchange, dropping the oldest once the history is full.
    pub fn push_exchange(&mut self, input: impl Into<String>, response: impl Into<String>) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(Exchange {
            input: input.into(),
            response: response.into(),
        });
    }

    /// Recorded exchanges, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &Exchange> {
        self.history.iter()
    }

    /// The `n`-th most recent exchange, counting from 1.
    pub fn exchange(&self, n: usize) -> Option<&Exchange> {
        let back = n.checked_sub(1)?;
        self.history.iter().rev().nth(back)
    }

    /// The `n`-th most recent recorded input, counting from 1.
    pub fn input(&self, n: usize) -> Option<&str> {
        self.exchange(n).map(|e| e.input.as_str())
    }

    /// The `n`-th most recent recorded response, counting from 1.
    pub fn response(&self, n: usize) -> Option<&str> {
        self.exchange(n).map(|e| e.response.as_str())
    }

    pub fn last_response(&self) -> Option<&str> {
        self.response(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unset_predicates_fall_back() {
        let mut session = Session::new("s1", 10);
        assert_eq!(session.predicate("name"), None);
        assert_eq!(session.predicate_or("name", "unknown"), "unknown");

        session.set_predicate("name", "Bob");
        assert_eq!(session.predicate_or("name", "unknown"), "Bob");
    }

    #[test]
    fn topic_is_a_predicate() {
        let mut session = Session::new("s1", 10);
        assert_eq!(session.topic(), "");
        session.set_predicate(TOPIC, "cats");
        assert_eq!(session.topic(), "cats");
    }

    #[test]
    fn history_is_bounded_and_indexed_from_the_end() {
        let mut session = Session::new("s1", 2);
        session.push_exchange("one", "1");
        session.push_exchange("two", "2");
        session.push_exchange("three", "3");

        let inputs: Vec<&str> = session.history().map(|e| e.input.as_str()).collect();
        assert_eq!(inputs, ["two", "three"]);
        assert_eq!(session.input(1), Some("three"));
        assert_eq!(session.response(2), Some("2"));
        assert_eq!(session.response(3), None);
        assert_eq!(session.input(0), None);
        assert_eq!(session.last_response(), Some("3"));
    }

    #[test]
    fn zero_limit_keeps_no_history() {
        let mut session = Session::new("s1", 0);
        session.push_exchange("hi", "hello");
        assert_eq!(session.last_response(), None);
    }

    #[test]
    fn serializes_for_inspection() {
        let mut session = Session::new("s1", 10);
        session.set_predicate("name", "Bob");
        session.push_exchange("hi", "hello");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["predicates"]["name"], "Bob");
        assert_eq!(json["history"][0]["response"], "hello");
    }
}
