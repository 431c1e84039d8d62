//! The response template tree.
//!
//! Templates are plain data: a closed set of node kinds that the
//! [`crate::Renderer`] dispatches on with a single `match`. They are
//! serializable so that rule documents can carry them, e.g.
//!
//! ```json
//! {"sequence": [
//!     {"text": "Hello, "},
//!     {"get": {"name": "name"}},
//!     {"literal": "!"}
//! ]}
//! ```

use parley_graph::Segment;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

fn first() -> usize {
    1
}

/// A response template node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    /// Authored text. Runs of whitespace render as a single space.
    Text(String),
    /// Text rendered exactly as written.
    Literal(String),
    /// Each child in order, concatenated.
    Sequence(Vec<Template>),
    /// One child chosen uniformly at random. Renders nothing when empty.
    Random(Vec<Template>),
    Condition(Condition),
    /// Render the child, then answer the result as if it were new input.
    Reduce(Box<Template>),
    /// Render `value` and store it in the session predicate `name`.
    Set { name: String, value: Box<Template> },
    Get { name: String },
    /// The text bound by the `index`-th wildcard of `segment`, from 1.
    Wildcard {
        segment: Segment,
        #[serde(default = "first")]
        index: usize,
    },
    /// Render the child for its side effects only.
    Think(Box<Template>),
    Case { shape: CaseShape, body: Box<Template> },
    Person { shape: PersonShape, body: Box<Template> },
    /// A bot property.
    Bot { name: String },
    /// 1 is the sentence being answered, 2 the input before it, and so on.
    Input {
        #[serde(default = "first")]
        index: usize,
    },
    /// 1 is the most recent reply, 2 the one before it, and so on.
    That {
        #[serde(default = "first")]
        index: usize,
    },
    /// The session id.
    Id,
    /// Number of rules learned.
    Size,
    Version,
    Date,
}

/// Text transforms applied to a rendered child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseShape {
    Upper,
    Lower,
    /// Capitalize the first word.
    Sentence,
    /// Capitalize every word.
    Formal,
}

/// Pronoun swaps applied to a rendered child through a substitution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonShape {
    /// First person ↔ third person.
    Person,
    /// First person ↔ second person.
    Person2,
    /// He ↔ she.
    Gender,
}

/// Branching on session predicates.
///
/// Three authoring forms share this shape:
///
/// * a `name` with a single branch: render it if the predicate has that value;
/// * a `name` with several branches: the first branch whose value matches;
/// * no `name`, with a `name` on every branch.
///
/// In every form `default` renders when no branch matched. Values compare
/// trimmed and case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Box<Template>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Overrides the condition's predicate name for this branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
    pub body: Template,
}

impl Condition {
    /// The single `name`/`value` form.
    pub fn when(name: impl Into<String>, value: impl Into<String>, body: Template) -> Self {
        Condition {
            name: Some(name.into()),
            branches: vec![Branch {
                name: None,
                value: value.into(),
                body,
            }],
            default: None,
        }
    }

    pub fn on(name: impl Into<String>) -> Self {
        Condition {
            name: Some(name.into()),
            ..Condition::default()
        }
    }

    pub fn with_branch(mut self, value: impl Into<String>, body: Template) -> Self {
        self.branches.push(Branch {
            name: None,
            value: value.into(),
            body,
        });
        self
    }

    pub fn with_named_branch(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        body: Template,
    ) -> Self {
        self.branches.push(Branch {
            name: Some(name.into()),
            value: value.into(),
            body,
        });
        self
    }

    pub fn with_default(mut self, body: Template) -> Self {
        self.default = Some(Box::new(body));
        self
    }
}

impl Template {
    pub fn text(text: impl Into<String>) -> Self {
        Template::Text(text.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Template::Literal(text.into())
    }

    pub fn seq(children: impl IntoIterator<Item = Template>) -> Self {
        Template::Sequence(children.into_iter().collect())
    }

    pub fn random(children: impl IntoIterator<Item = Template>) -> Self {
        Template::Random(children.into_iter().collect())
    }

    pub fn reduce(body: Template) -> Self {
        Template::Reduce(Box::new(body))
    }

    pub fn set(name: impl Into<String>, value: Template) -> Self {
        Template::Set {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn get(name: impl Into<String>) -> Self {
        Template::Get { name: name.into() }
    }

    pub fn think(body: Template) -> Self {
        Template::Think(Box::new(body))
    }

    pub fn case(shape: CaseShape, body: Template) -> Self {
        Template::Case {
            shape,
            body: Box::new(body),
        }
    }

    pub fn person(shape: PersonShape, body: Template) -> Self {
        Template::Person {
            shape,
            body: Box::new(body),
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Template::Bot { name: name.into() }
    }

    /// The `index`-th input wildcard.
    pub fn star(index: usize) -> Self {
        Template::Wildcard {
            segment: Segment::Pattern,
            index,
        }
    }

    pub fn wildcard(segment: Segment, index: usize) -> Self {
        Template::Wildcard { segment, index }
    }

    /// Answer the first input wildcard as new input.
    pub fn reduce_star() -> Self {
        Template::reduce(Template::star(1))
    }

    /// Apply a pronoun swap to the first input wildcard.
    pub fn person_star(shape: PersonShape) -> Self {
        Template::person(shape, Template::star(1))
    }

    /// Check that the tree can be rendered without surprises.
    ///
    /// Rejects empty predicate and property names, zero indices, and
    /// condition branches that have no predicate to test.
    pub fn validate(&self) -> Result<(), TemplateError> {
        match self {
            Template::Text(_)
            | Template::Literal(_)
            | Template::Id
            | Template::Size
            | Template::Version
            | Template::Date => Ok(()),
            Template::Sequence(children) | Template::Random(children) => {
                children.iter().try_for_each(Template::validate)
            }
            Template::Condition(condition) => condition.validate(),
            Template::Reduce(body) | Template::Think(body) => body.validate(),
            Template::Case { body, .. } | Template::Person { body, .. } => body.validate(),
            Template::Set { name, value } => {
                require_name("set", name)?;
                value.validate()
            }
            Template::Get { name } => require_name("get", name),
            Template::Bot { name } => require_name("bot", name),
            Template::Wildcard { index, .. } => require_index("wildcard", *index),
            Template::Input { index } => require_index("input", *index),
            Template::That { index } => require_index("that", *index),
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::text(text)
    }
}

impl Condition {
    fn validate(&self) -> Result<(), TemplateError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TemplateError::Malformed {
                reason: "condition has an empty predicate name".to_string(),
            });
        }
        for branch in &self.branches {
            let name = branch.name.as_deref().or(self.name.as_deref());
            if name.is_none_or(|n| n.trim().is_empty()) {
                return Err(TemplateError::Malformed {
                    reason: format!(
                        "condition branch for '{}' has no predicate to test",
                        branch.value
                    ),
                });
            }
            branch.body.validate()?;
        }
        match &self.default {
            Some(default) => default.validate(),
            None => Ok(()),
        }
    }
}

fn require_name(node: &str, name: &str) -> Result<(), TemplateError> {
    if name.trim().is_empty() {
        return Err(TemplateError::Malformed {
            reason: format!("{node} needs a name"),
        });
    }
    Ok(())
}

fn require_index(node: &str, index: usize) -> Result<(), TemplateError> {
    if index == 0 {
        return Err(TemplateError::Malformed {
            reason: format!("{node} indices count from 1"),
        });
    }
    Ok(())
}
