//! # parley-session
//!
//! Conversation state: one [`Session`] per conversation id, kept in a
//! [`SessionStore`].
//!
//! A session holds the predicates set by response templates, a bounded
//! history of exchanges, and the current topic (the reserved `topic`
//! predicate). Sessions are created on first contact and only removed when
//! the caller asks for it.

mod session;
mod store;

pub use session::{Exchange, Session, TOPIC};
pub use store::{SessionHandle, SessionStore};
