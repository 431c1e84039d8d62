use parley_graph::{GraphResult, MatchPath, Pattern};
use parley_template::Template;
use serde::{Deserialize, Serialize};

/// One authored rule.
///
/// An empty context or topic places no constraint on that segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: Pattern,
    #[serde(default)]
    pub context: Pattern,
    #[serde(default)]
    pub topic: Pattern,
    pub template: Template,
}

impl Rule {
    pub fn new(pattern: Pattern, template: Template) -> Self {
        Rule {
            pattern,
            context: Pattern::default(),
            topic: Pattern::default(),
            template,
        }
    }

    /// Parse all three patterns from text.
    pub fn parse(
        pattern: &str,
        context: &str,
        topic: &str,
        template: Template,
    ) -> GraphResult<Self> {
        Ok(Rule {
            pattern: pattern.parse()?,
            context: context.parse()?,
            topic: topic.parse()?,
            template,
        })
    }

    pub fn with_context(mut self, context: Pattern) -> Self {
        self.context = context;
        self
    }

    pub fn with_topic(mut self, topic: Pattern) -> Self {
        self.topic = topic;
        self
    }

    pub(crate) fn into_parts(self) -> (MatchPath, Template) {
        let path = MatchPath::new(self.pattern, self.context, self.topic);
        (path, self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_with_optional_segments() {
        let rule: Rule =
            serde_json::from_str(r#"{"pattern": "hello *", "template": {"text": "Hi!"}}"#).unwrap();
        assert_eq!(rule.pattern.to_string(), "HELLO *");
        assert!(rule.context.is_empty());

        let (path, template) = rule.into_parts();
        assert_eq!(path.to_string(), "HELLO * <that> * <topic> *");
        assert_eq!(template, Template::text("Hi!"));
    }

    #[test]
    fn bad_patterns_fail_to_decode() {
        let result = serde_json::from_str::<Rule>(r#"{"pattern": "what's up", "template": "id"}"#);
        assert!(result.is_err());
    }
}
