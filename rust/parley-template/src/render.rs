//! The template interpreter.

use std::fmt;

use parley_graph::{Captures, MatchKey, Segment};
use parley_normalize::{SubstitutionTable, Token, join_original};
use parley_session::Session;
use rand::{Rng, RngCore};
use serde::Serialize;

use crate::ast::{Condition, PersonShape, Template};
use crate::environment::{DATE_FORMAT, Environment};

/// The lookup a template is being rendered for.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'m> {
    key: &'m MatchKey,
    captures: &'m Captures,
}

impl<'m> MatchContext<'m> {
    pub fn new(key: &'m MatchKey, captures: &'m Captures) -> Self {
        MatchContext { key, captures }
    }

    pub fn key(&self) -> &MatchKey {
        self.key
    }

    /// The text bound by a wildcard, or nothing when `index` is out of range.
    pub fn wildcard(&self, segment: Segment, index: usize) -> String {
        self.captures
            .tokens(self.key, segment, index)
            .map(join_original)
            .unwrap_or_default()
    }
}

/// Something worth knowing about a render that still produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No rule matched the input.
    NoMatch { input: String },
    /// A `Reduce` was nested deeper than the recursion limit.
    RecursionLimitExceeded { input: String, limit: usize },
    /// A sentence evaluated more `Reduce` nodes than the reduction limit.
    ReductionLimitExceeded { input: String, limit: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoMatch { input } => write!(f, "no rule matched '{input}'"),
            Diagnostic::RecursionLimitExceeded { input, limit } => {
                write!(f, "recursion limit of {limit} reached while reducing '{input}'")
            }
            Diagnostic::ReductionLimitExceeded { input, limit } => {
                write!(f, "reduction limit of {limit} reached while reducing '{input}'")
            }
        }
    }
}

/// Renders templates for one session.
///
/// A renderer lives for one response computation: it holds the session
/// exclusively, so every predicate written by a `Set` is visible to the rest
/// of the computation and to nothing else until it finishes.
pub struct Renderer<'a> {
    env: Environment<'a>,
    session: &'a mut Session,
    rng: &'a mut dyn RngCore,
    bot_name: Vec<Token>,
    current_input: String,
    reductions: usize,
    reductions_exhausted: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Renderer<'a> {
    pub fn new(env: Environment<'a>, session: &'a mut Session, rng: &'a mut dyn RngCore) -> Self {
        let bot_name = env
            .bot
            .property("name")
            .map(|name| env.normalizer.normalize(&name))
            .unwrap_or_default();

        Renderer {
            env,
            session,
            rng,
            bot_name,
            current_input: String::new(),
            reductions: 0,
            reductions_exhausted: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn session(&mut self) -> &mut Session {
        self.session
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Answer one sentence of user input.
    ///
    /// Matches the sentence against the graph using the session's last reply
    /// as context and its topic, then renders the winning template with the
    /// full recursion budget. Returns an empty reply when nothing matches.
    pub fn answer(&mut self, sentence: &str) -> String {
        self.current_input = sentence.to_string();
        self.reductions = 0;
        self.reductions_exhausted = false;

        match self.respond_to(sentence, self.env.options.recursion_limit) {
            Some(reply) => reply,
            None => {
                tracing::warn!(input = sentence, "no rule matched");
                self.diagnostics.push(Diagnostic::NoMatch {
                    input: sentence.to_string(),
                });
                String::new()
            }
        }
    }

    /// Render `template` for `context`, allowing `budget` nested reductions.
    pub fn render(&mut self, template: &Template, context: &MatchContext<'_>, budget: usize) -> String {
        let mut out = String::new();
        self.eval(template, context, budget, &mut out);
        out
    }

    /// The match-and-render cycle shared by top-level input and `Reduce`.
    fn respond_to(&mut self, text: &str, budget: usize) -> Option<String> {
        let env = self.env;
        let pattern = env.normalizer.normalize(text);
        let context = env
            .normalizer
            .normalize_last_sentence(self.session.last_response().unwrap_or_default());
        let topic = env.normalizer.normalize(self.session.topic());
        let key = MatchKey::new(pattern, context, topic);

        let found = env.graph.find(&key, &self.bot_name)?;
        tracing::debug!(%key, rule = found.id.index(), "matched");

        let context = MatchContext::new(&key, &found.captures);
        Some(self.render(found.rule, &context, budget).trim().to_string())
    }

    fn eval(&mut self, node: &Template, context: &MatchContext<'_>, budget: usize, out: &mut String) {
        match node {
            Template::Text(text) => push_collapsed(out, text),
            Template::Literal(text) => out.push_str(text),
            Template::Sequence(children) => {
                for child in children {
                    self.eval(child, context, budget, out);
                }
            }
            Template::Random(children) => {
                if !children.is_empty() {
                    let choice = self.rng.gen_range(0..children.len());
                    self.eval(&children[choice], context, budget, out);
                }
            }
            Template::Condition(condition) => self.condition(condition, context, budget, out),
            Template::Reduce(body) => {
                let phrase = self.render(body, context, budget);
                let reply = self.reduce(&phrase, budget);
                out.push_str(&reply);
            }
            Template::Set { name, value } => {
                let value = self.render(value, context, budget);
                let value = value.trim();
                self.session.set_predicate(name.as_str(), value);
                if self.env.options.set_renders_value {
                    out.push_str(value);
                }
            }
            Template::Get { name } => out.push_str(self.predicate(name)),
            Template::Wildcard { segment, index } => {
                out.push_str(&context.wildcard(*segment, *index));
            }
            Template::Think(body) => {
                self.render(body, context, budget);
            }
            Template::Case { shape, body } => {
                let text = self.render(body, context, budget);
                out.push_str(&crate::shape::apply(*shape, &text));
            }
            Template::Person { shape, body } => {
                let text = self.render(body, context, budget);
                out.push_str(&self.person_table(*shape).substitute(&text));
            }
            Template::Bot { name } => {
                if let Some(value) = self.env.bot.property(name) {
                    out.push_str(&value);
                }
            }
            Template::Input { index } => {
                let input = match *index {
                    1 => Some(self.current_input.as_str()),
                    n => n.checked_sub(1).and_then(|back| self.session.input(back)),
                };
                out.push_str(input.unwrap_or_default());
            }
            Template::That { index } => {
                out.push_str(self.session.response(*index).unwrap_or_default());
            }
            Template::Id => out.push_str(self.session.id()),
            Template::Size => out.push_str(&self.env.graph.len().to_string()),
            Template::Version => out.push_str(&self.env.options.version),
            Template::Date => {
                out.push_str(&self.env.clock.now().format(DATE_FORMAT).to_string());
            }
        }
    }

    fn condition(
        &mut self,
        condition: &Condition,
        context: &MatchContext<'_>,
        budget: usize,
        out: &mut String,
    ) {
        let chosen = condition
            .branches
            .iter()
            .find(|branch| {
                branch
                    .name
                    .as_deref()
                    .or(condition.name.as_deref())
                    .is_some_and(|name| same_value(self.predicate(name), &branch.value))
            })
            .map(|branch| &branch.body)
            .or(condition.default.as_deref());

        if let Some(body) = chosen {
            self.eval(body, context, budget, out);
        }
    }

    /// Answer `phrase` as new input, spending one unit of `budget`.
    fn reduce(&mut self, phrase: &str, budget: usize) -> String {
        let options = self.env.options;

        if budget == 0 {
            tracing::warn!(input = phrase, limit = options.recursion_limit, "recursion limit reached");
            self.diagnostics.push(Diagnostic::RecursionLimitExceeded {
                input: phrase.to_string(),
                limit: options.recursion_limit,
            });
            return options.recursion_fallback.clone();
        }

        if self.reductions >= options.reduction_limit {
            if !self.reductions_exhausted {
                self.reductions_exhausted = true;
                tracing::warn!(input = phrase, limit = options.reduction_limit, "reduction limit reached");
                self.diagnostics.push(Diagnostic::ReductionLimitExceeded {
                    input: phrase.to_string(),
                    limit: options.reduction_limit,
                });
            }
            return options.recursion_fallback.clone();
        }
        self.reductions += 1;

        match self.respond_to(phrase, budget - 1) {
            Some(reply) => reply,
            None => {
                tracing::debug!(input = phrase, "no rule matched reduction");
                self.diagnostics.push(Diagnostic::NoMatch {
                    input: phrase.to_string(),
                });
                String::new()
            }
        }
    }

    fn predicate(&self, name: &str) -> &str {
        self.session
            .predicate_or(name, &self.env.options.default_predicate)
    }

    fn person_table(&self, shape: PersonShape) -> &SubstitutionTable {
        let tables = self.env.substitutions;
        match shape {
            PersonShape::Person => &tables.person,
            PersonShape::Person2 => &tables.person2,
            PersonShape::Gender => &tables.gender,
        }
    }
}

fn same_value(actual: &str, expected: &str) -> bool {
    actual.trim().to_lowercase() == expected.trim().to_lowercase()
}

/// Append `text` with every run of whitespace reduced to one space.
fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}
