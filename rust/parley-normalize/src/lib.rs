//! # parley-normalize
//!
//! The text pipeline that turns raw conversational input into the tokens the
//! pattern graph matches against.
//!
//! ## Pipeline
//!
//! ```text
//! raw text → sentences → words → strip edge punctuation
//!   → pre-substitution ("what's" → "what is") → split inner punctuation
//!     → fold to upper case → Token { value, original }
//! ```
//!
//! Every step is a pure function of its input and the substitution table the
//! [`Normalizer`] was built with, so a normalizer can be shared freely between
//! threads.
//!
//! The same [`SubstitutionTable`] machinery drives the post-substitution
//! transforms used by response templates (person, person2 and gender
//! swapping), see [`SubstitutionTables`].
//!
//! ## Example
//!
//! ```
//! use parley_normalize::{Normalizer, SubstitutionTables};
//!
//! let normalizer = Normalizer::new(SubstitutionTables::default().normal);
//! let tokens = normalizer.normalize("What's your name?");
//!
//! let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
//! assert_eq!(values, ["WHAT", "IS", "YOUR", "NAME"]);
//! ```

pub mod defaults;
pub mod error;
pub mod normalizer;
pub mod sentence;
pub mod substitution;
pub mod token;

pub use error::SubstitutionError;
pub use normalizer::Normalizer;
pub use sentence::sentences;
pub use substitution::{SubstitutionTable, SubstitutionTables};
pub use token::{Token, join_original, join_values};
