use std::collections::HashMap;

use parking_lot::RwLock;
use parley_template::BotProperties;

/// The bot's read-only properties as seen by templates.
///
/// Templates cannot write here; only the embedding program can, through
/// [`BotPropertyStore::set`].
#[derive(Debug)]
pub struct BotPropertyStore {
    properties: RwLock<HashMap<String, String>>,
}

impl Default for BotPropertyStore {
    fn default() -> Self {
        BotPropertyStore::new().with("name", "Nameless")
    }
}

impl BotPropertyStore {
    /// A store with no properties at all.
    pub fn new() -> Self {
        BotPropertyStore {
            properties: RwLock::new(HashMap::new()),
        }
    }

    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.properties.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.write().insert(name.into(), value.into());
    }
}

impl BotProperties for BotPropertyStore {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name)
    }
}
