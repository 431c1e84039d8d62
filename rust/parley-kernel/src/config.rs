use parley_graph::{Consumption, DuplicatePolicy, GraphOptions};
use parley_template::RenderOptions;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};

/// Settings for a [`crate::Kernel`].
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration:
///
/// ```
/// use parley_kernel::KernelConfig;
///
/// let config = KernelConfig::from_json(r#"{"recursion_limit": 10, "seed": 42}"#).unwrap();
/// assert_eq!(config.recursion_limit, 10);
/// assert_eq!(config.history_limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// How deeply `Reduce` nodes may nest within one sentence.
    pub recursion_limit: usize,
    /// How many `Reduce` nodes one sentence may evaluate in total.
    pub reduction_limit: usize,
    /// Reported for predicates that were never set.
    pub default_predicate_value: String,
    pub duplicate_rule_policy: DuplicatePolicy,
    pub wildcard_consumption: Consumption,
    /// Accept patterns such as `A * ^ B`.
    pub adjacent_wildcards: bool,
    /// Whether a `Set` node renders the value it stores.
    pub set_renders_value: bool,
    /// Exchanges kept per session.
    pub history_limit: usize,
    /// Rendered in place of a reduction that ran out of budget.
    pub recursion_fallback: String,
    /// Seed for the kernel's random source. Unseeded kernels draw from the
    /// operating system.
    pub seed: Option<u64>,
    pub version: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            recursion_limit: 50,
            reduction_limit: 1000,
            default_predicate_value: String::new(),
            duplicate_rule_policy: DuplicatePolicy::Overwrite,
            wildcard_consumption: Consumption::Greedy,
            adjacent_wildcards: false,
            set_renders_value: true,
            history_limit: 10,
            recursion_fallback: String::new(),
            seed: None,
            version: concat!("Parley ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl KernelConfig {
    pub fn from_json(text: &str) -> KernelResult<Self> {
        serde_json::from_str(text).map_err(KernelError::Config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_duplicate_rule_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_rule_policy = policy;
        self
    }

    pub fn with_default_predicate_value(mut self, value: impl Into<String>) -> Self {
        self.default_predicate_value = value.into();
        self
    }

    pub(crate) fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            consumption: self.wildcard_consumption,
            adjacent_wildcards: self.adjacent_wildcards,
        }
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            recursion_limit: self.recursion_limit,
            reduction_limit: self.reduction_limit,
            recursion_fallback: self.recursion_fallback.clone(),
            default_predicate: self.default_predicate_value.clone(),
            set_renders_value: self.set_renders_value,
            version: self.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_is_the_default() {
        assert_eq!(KernelConfig::from_json("{}").unwrap(), KernelConfig::default());
    }

    #[test]
    fn policies_decode_by_name() {
        let config = KernelConfig::from_json(
            r#"{"duplicate_rule_policy": "reject", "wildcard_consumption": "lazy"}"#,
        )
        .unwrap();
        assert_eq!(config.duplicate_rule_policy, DuplicatePolicy::Reject);
        assert_eq!(config.graph_options().consumption, Consumption::Lazy);
    }

    #[test]
    fn bad_json_is_a_config_error() {
        let error = KernelConfig::from_json(r#"{"recursion_limit": "deep"}"#).unwrap_err();
        assert!(matches!(error, KernelError::Config(_)));
    }

    #[test]
    fn render_options_follow_the_config() {
        let config = KernelConfig::default()
            .with_recursion_limit(3)
            .with_default_predicate_value("unknown");
        let options = config.render_options();
        assert_eq!(options.recursion_limit, 3);
        assert_eq!(options.default_predicate, "unknown");
        assert_eq!(options.version, config.version);
    }
}
