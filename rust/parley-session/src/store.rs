use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::session::Session;

/// Shared access to one session.
///
/// Holding the lock for the duration of a response serializes calls for the
/// same session id while leaving other sessions free.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory map from session id to [`Session`].
///
/// The store never evicts on its own; sessions live until
/// [`SessionStore::remove`] is called.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    default_value: String,
    history_limit: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new("", 10)
    }
}

impl SessionStore {
    pub fn new(default_value: impl Into<String>, history_limit: usize) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            default_value: default_value.into(),
            history_limit,
        }
    }

    /// The value reported for predicates that were never set.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().get(id).cloned()
    }

    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(session) = self.get(id) {
            return session;
        }

        self.sessions
            .write()
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = id, "creating session");
                Arc::new(Mutex::new(Session::new(id, self.history_limit)))
            })
            .clone()
    }

    /// Read a predicate without creating the session.
    pub fn get_predicate(&self, id: &str, name: &str) -> String {
        self.get(id)
            .and_then(|session| session.lock().predicate(name).map(str::to_string))
            .unwrap_or_else(|| self.default_value.clone())
    }

    pub fn set_predicate(&self, id: &str, name: &str, value: &str) {
        self.get_or_create(id).lock().set_predicate(name, value);
    }

    pub fn push_history(&self, id: &str, input: &str, response: &str) {
        self.get_or_create(id).lock().push_exchange(input, response);
    }

    /// The topic of `id`; empty when unset or when the session is unknown.
    pub fn current_topic(&self, id: &str) -> String {
        self.get(id)
            .map(|session| session.lock().topic().to_string())
            .unwrap_or_default()
    }

    /// A copy of the session's current state.
    pub fn snapshot(&self, id: &str) -> Option<Session> {
        self.get(id).map(|session| session.lock().clone())
    }

    /// Forget a session. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
