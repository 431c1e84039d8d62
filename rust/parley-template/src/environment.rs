//! Everything a render reads but never changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parley_graph::PatternGraph;
use parley_normalize::{Normalizer, SubstitutionTables};

use crate::ast::Template;

/// Read-only bot properties, such as its name.
pub trait BotProperties: Send + Sync {
    fn property(&self, name: &str) -> Option<String>;
}

impl BotProperties for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// The source of the current time for `Date` nodes.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Format used by `Date` nodes, e.g. `Sun Sep  7 09:30:00 2025`.
pub const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Tunables for a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// How deeply `Reduce` nodes may nest.
    pub recursion_limit: usize,
    /// How many `Reduce` nodes one top-level sentence may evaluate in total.
    pub reduction_limit: usize,
    /// Rendered by a `Reduce` node that ran out of budget.
    pub recursion_fallback: String,
    /// Value of predicates that were never set.
    pub default_predicate: String,
    /// Whether `Set` renders the stored value or nothing.
    pub set_renders_value: bool,
    pub version: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            recursion_limit: 50,
            reduction_limit: 1000,
            recursion_fallback: String::new(),
            default_predicate: String::new(),
            set_renders_value: true,
            version: concat!("Parley ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The shared, immutable inputs of a render.
///
/// Bundles the graph snapshot with the collaborators it is answered
/// against, so none of them has to live in global state.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub graph: &'a PatternGraph<Template>,
    pub normalizer: &'a Normalizer,
    pub substitutions: &'a SubstitutionTables,
    pub bot: &'a dyn BotProperties,
    pub clock: &'a dyn Clock,
    pub options: &'a RenderOptions,
}
