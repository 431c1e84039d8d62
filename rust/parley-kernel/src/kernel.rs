use parking_lot::{Mutex, RwLock};
use parley_graph::{Insertion, PatternGraph};
use parley_normalize::{Normalizer, SubstitutionTables, sentences};
use parley_session::{Session, SessionStore};
use parley_template::{
    Clock, Diagnostic, Environment, RenderOptions, Renderer, SystemClock, Template,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::bot::BotPropertyStore;
use crate::config::KernelConfig;
use crate::error::{KernelError, KernelResult};
use crate::loader::DocumentLoader;
use crate::rule::Rule;

/// The session used by callers that do not track conversations.
pub const GLOBAL_SESSION: &str = "_global";

/// A reply together with anything noteworthy that happened producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// A rule [`Kernel::learn`] refused.
#[derive(Debug)]
pub struct Rejection {
    pub path: String,
    pub error: KernelError,
}

/// What a call to [`Kernel::learn`] did.
#[derive(Debug, Default)]
pub struct LearnReport {
    pub added: usize,
    pub replaced: usize,
    pub rejected: Vec<Rejection>,
}

/// Learns rules and answers input against them.
///
/// A kernel is shared between threads by reference. Learning takes the
/// graph's write lock for the whole batch, so a response never sees half of
/// a batch. Responses for different sessions run in parallel; responses for
/// the same session wait for each other.
pub struct Kernel {
    config: KernelConfig,
    render_options: RenderOptions,
    graph: RwLock<PatternGraph<Template>>,
    sessions: SessionStore,
    normalizer: Normalizer,
    substitutions: SubstitutionTables,
    bot: BotPropertyStore,
    clock: Box<dyn Clock>,
    rng: Mutex<ChaCha8Rng>,
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::new(KernelConfig::default())
    }
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        let substitutions = SubstitutionTables::default();
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Kernel {
            render_options: config.render_options(),
            graph: RwLock::new(PatternGraph::with_options(config.graph_options())),
            sessions: SessionStore::new(
                config.default_predicate_value.clone(),
                config.history_limit,
            ),
            normalizer: Normalizer::new(substitutions.normal.clone()),
            substitutions,
            bot: BotPropertyStore::default(),
            clock: Box::new(SystemClock),
            rng: Mutex::new(rng),
            config,
        }
    }

    pub fn with_substitutions(mut self, substitutions: SubstitutionTables) -> Self {
        self.normalizer = Normalizer::new(substitutions.normal.clone());
        self.substitutions = substitutions;
        self
    }

    pub fn with_bot_properties(mut self, bot: BotPropertyStore) -> Self {
        self.bot = bot;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn bot_properties(&self) -> &BotPropertyStore {
        &self.bot
    }

    /// Insert `rules` into the graph.
    ///
    /// Each rule's template is validated before it is inserted. Rules that
    /// fail validation, or collide with an existing rule under
    /// [`parley_graph::DuplicatePolicy::Reject`], are reported and skipped;
    /// the rest of the batch is still learned.
    pub fn learn(&self, rules: impl IntoIterator<Item = Rule>) -> LearnReport {
        let policy = self.config.duplicate_rule_policy;
        let mut report = LearnReport::default();
        let mut graph = self.graph.write();

        for rule in rules {
            let (path, template) = rule.into_parts();
            let outcome = match template.validate() {
                Ok(()) => graph.insert(&path, template, policy).map_err(KernelError::from),
                Err(error) => Err(error.into()),
            };

            match outcome {
                Ok(Insertion::Added(_)) => report.added += 1,
                Ok(Insertion::Replaced(_)) => report.replaced += 1,
                Err(error) => {
                    tracing::warn!(%path, %error, "rejected rule");
                    report.rejected.push(Rejection {
                        path: path.to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            added = report.added,
            replaced = report.replaced,
            rejected = report.rejected.len(),
            total = graph.len(),
            "learned rules"
        );
        report
    }

    /// Load rules from `loader` and learn them.
    pub fn learn_from<L: DocumentLoader>(&self, loader: &L) -> KernelResult<LearnReport> {
        let rules = loader
            .load()
            .map_err(|error| KernelError::Load(Box::new(error)))?;
        tracing::debug!(rules = rules.len(), "loaded document");
        Ok(self.learn(rules))
    }

    /// Number of rules learned.
    pub fn num_rules(&self) -> usize {
        self.graph.read().len()
    }

    pub fn respond(&self, session_id: &str, input: &str) -> String {
        self.exchange(session_id, input).text
    }

    /// Answer `input` for `session_id`, creating the session if needed.
    ///
    /// Randomness is drawn from the kernel's own source.
    pub fn exchange(&self, session_id: &str, input: &str) -> Reply {
        let seed = self.rng.lock().next_u64();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.respond_with(session_id, input, &mut rng)
    }

    /// Answer `input` for `session_id` using the caller's random source.
    ///
    /// Each sentence of the input is answered on its own and recorded as its
    /// own exchange, so a later sentence sees the reply to an earlier one as
    /// context. The non-empty replies are joined with two spaces.
    pub fn respond_with(&self, session_id: &str, input: &str, rng: &mut dyn RngCore) -> Reply {
        let handle = self.sessions.get_or_create(session_id);
        let mut session = handle.lock();
        let graph = self.graph.read();

        let env = Environment {
            graph: &graph,
            normalizer: &self.normalizer,
            substitutions: &self.substitutions,
            bot: &self.bot,
            clock: self.clock.as_ref(),
            options: &self.render_options,
        };
        let mut renderer = Renderer::new(env, &mut session, rng);

        let mut parts = sentences(input);
        if parts.is_empty() {
            parts.push(input.trim().to_string());
        }
        tracing::debug!(session = session_id, sentences = parts.len(), "responding");

        let mut replies = Vec::with_capacity(parts.len());
        for sentence in parts {
            let reply = renderer.answer(&sentence);
            renderer.session().push_exchange(sentence, reply.clone());
            if !reply.is_empty() {
                replies.push(reply);
            }
        }

        Reply {
            text: replies.join("  "),
            diagnostics: renderer.take_diagnostics(),
        }
    }

    /// A predicate of `session_id`, or the configured default.
    pub fn predicate(&self, session_id: &str, name: &str) -> String {
        self.sessions.get_predicate(session_id, name)
    }

    pub fn set_predicate(&self, session_id: &str, name: &str, value: &str) {
        self.sessions.set_predicate(session_id, name, value);
    }

    pub fn session_snapshot(&self, session_id: &str) -> Option<Session> {
        self.sessions.snapshot(session_id)
    }

    /// Forget a session. Returns whether it existed.
    pub fn remove_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_graph::{DuplicatePolicy, GraphError};
    use parley_template::TemplateError;
    use pretty_assertions::assert_eq;

    fn rule(pattern: &str, template: Template) -> Rule {
        Rule::parse(pattern, "", "", template).unwrap()
    }

    #[test]
    fn learn_reports_each_outcome() {
        let kernel = Kernel::new(KernelConfig::default().with_seed(1));
        let report = kernel.learn([
            rule("HELLO", "one".into()),
            rule("HELLO", "two".into()),
            rule("BROKEN", Template::get("")),
            rule("A * ^", "adjacent".into()),
        ]);

        assert_eq!(report.added, 1);
        assert_eq!(report.replaced, 1);
        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(
            report.rejected[0].error,
            KernelError::Template(TemplateError::Malformed { .. })
        ));
        assert!(matches!(
            report.rejected[1].error,
            KernelError::Graph(GraphError::InvalidPatternSyntax { .. })
        ));
        assert_eq!(kernel.num_rules(), 1);
        assert_eq!(kernel.respond("s", "hello"), "two");
    }

    #[test]
    fn reject_policy_keeps_the_first_rule() {
        let kernel = Kernel::new(
            KernelConfig::default().with_duplicate_rule_policy(DuplicatePolicy::Reject),
        );
        let report = kernel.learn([rule("HELLO", "one".into()), rule("HELLO", "two".into())]);

        assert_eq!(report.added, 1);
        assert!(matches!(
            report.rejected[0].error,
            KernelError::Graph(GraphError::DuplicateRule { .. })
        ));
        assert_eq!(kernel.respond("s", "hello"), "one");
    }

    #[test]
    fn sentences_are_answered_separately() {
        let kernel = Kernel::default();
        kernel.learn([rule("HI", "Hello.".into()), rule("BYE", "Goodbye.".into())]);

        assert_eq!(kernel.respond("s", "Hi. Bye!"), "Hello.  Goodbye.");
        let session = kernel.session_snapshot("s").unwrap();
        assert_eq!(session.history().count(), 2);
        assert_eq!(session.input(1), Some("Bye!"));
    }

    #[test]
    fn unmatched_sentences_leave_no_gap() {
        let kernel = Kernel::default();
        kernel.learn([rule("HI", "Hello.".into())]);

        let reply = kernel.exchange("s", "Hi. What? Hi.");
        assert_eq!(reply.text, "Hello.  Hello.");
        assert_eq!(
            reply.diagnostics,
            vec![Diagnostic::NoMatch {
                input: "What?".to_string()
            }]
        );
    }

    #[test]
    fn empty_input_reaches_permissive_rules() {
        let kernel = Kernel::default();
        kernel.learn([rule("^", "Say something.".into())]);
        assert_eq!(kernel.respond("s", "  "), "Say something.");
        assert_eq!(kernel.respond("s", "?!"), "Say something.");
    }

    #[test]
    fn sessions_are_created_on_demand_and_removable() {
        let kernel = Kernel::new(KernelConfig::default().with_default_predicate_value("unknown"));
        assert!(kernel.session_snapshot("s").is_none());
        kernel.respond("s", "anything");
        assert!(kernel.session_snapshot("s").is_some());
        assert_eq!(kernel.predicate("s", "name"), "unknown");

        assert!(kernel.remove_session("s"));
        assert!(kernel.session_snapshot("s").is_none());
    }
}
