//! # parley-template
//!
//! Response templates and the interpreter that renders them.
//!
//! A [`Template`] is a tree of nodes: text, predicate reads and writes,
//! conditions, random choice, case and pronoun transforms, and [`Reduce`],
//! which answers a rendered phrase as if the user had typed it. The
//! [`Renderer`] walks the tree depth first, left to right, with a single
//! `match` over the node kind.
//!
//! Reduction can loop when rules reduce into each other. Every render
//! carries an explicit budget of nested reductions plus a cap on the total
//! number of reductions per sentence; running out yields a fallback text and
//! a [`Diagnostic`] rather than an error.
//!
//! [`Reduce`]: Template::Reduce

mod ast;
mod environment;
mod error;
mod render;
mod shape;

pub use ast::{Branch, CaseShape, Condition, PersonShape, Template};
pub use environment::{
    BotProperties, Clock, DATE_FORMAT, Environment, FixedClock, RenderOptions, SystemClock,
};
pub use error::TemplateError;
pub use render::{Diagnostic, MatchContext, Renderer};
