use parley_graph::GraphError;
use parley_template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A [`crate::DocumentLoader`] could not produce its rules.
    #[error("failed to load rules: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),
}

pub type KernelResult<T> = Result<T, KernelError>;
