//! # parley-kernel
//!
//! The entry point of Parley: a [`Kernel`] learns [`Rule`]s into its pattern
//! graph and answers conversational input against them.
//!
//! ```
//! use parley_kernel::{Kernel, KernelConfig, Rule};
//! use parley_template::Template;
//!
//! let kernel = Kernel::new(KernelConfig::default().with_seed(7));
//! kernel.learn([
//!     Rule::parse("MY NAME IS *", "", "", Template::seq([
//!         Template::text("Nice to meet you, "),
//!         Template::set("name", Template::star(1)),
//!         Template::literal("."),
//!     ])).unwrap(),
//!     Rule::parse("WHAT IS MY NAME", "", "", Template::seq([
//!         Template::text("Your name is "),
//!         Template::get("name"),
//!         Template::literal("."),
//!     ])).unwrap(),
//! ]);
//!
//! assert_eq!(kernel.respond("alice", "My name is Alice"), "Nice to meet you, Alice.");
//! assert_eq!(kernel.respond("alice", "What's my name?"), "Your name is Alice.");
//! assert_eq!(kernel.predicate("bob", "name"), "");
//! ```
//!
//! Each response runs normalize → match → render for every sentence of the
//! input, then records the exchange in the session. Everything a response
//! depends on besides the session is either immutable or injected: the
//! random source, the clock, the substitution tables and the bot properties.

mod bot;
mod config;
mod error;
mod kernel;
mod loader;
mod rule;

pub use bot::BotPropertyStore;
pub use config::KernelConfig;
pub use error::{KernelError, KernelResult};
pub use kernel::{GLOBAL_SESSION, Kernel, LearnReport, Rejection, Reply};
pub use loader::{DocumentLoader, JsonDocument};
pub use rule::Rule;
