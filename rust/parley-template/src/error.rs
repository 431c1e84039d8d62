use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template cannot be rendered as written.
    #[error("malformed template: {reason}")]
    Malformed { reason: String },
}
