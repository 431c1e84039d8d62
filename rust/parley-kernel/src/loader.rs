//! Sources of rules.

use std::convert::Infallible;

use crate::rule::Rule;

/// Supplies rules, in order, from some authored document.
///
/// The kernel never reads authoring formats itself; a loader turns a
/// document into [`Rule`] records and the kernel learns them.
pub trait DocumentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<Vec<Rule>, Self::Error>;
}

impl DocumentLoader for Vec<Rule> {
    type Error = Infallible;

    fn load(&self) -> Result<Vec<Rule>, Self::Error> {
        Ok(self.clone())
    }
}

/// Rules encoded as a JSON array of [`Rule`] objects.
///
/// ```
/// use parley_kernel::{DocumentLoader, JsonDocument};
///
/// let document = JsonDocument::new(r#"[
///     {"pattern": "HELLO", "template": {"text": "Hi there!"}},
///     {"pattern": "YES", "context": "DO YOU LIKE *", "template": {"text": "Me too."}}
/// ]"#);
/// assert_eq!(document.load().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct JsonDocument {
    text: String,
}

impl JsonDocument {
    pub fn new(text: impl Into<String>) -> Self {
        JsonDocument { text: text.into() }
    }
}

impl DocumentLoader for JsonDocument {
    type Error = serde_json::Error;

    fn load(&self) -> Result<Vec<Rule>, Self::Error> {
        serde_json::from_str(&self.text)
    }
}
