use thiserror::Error;

use super::config::ConfigError;
use crate::core::fragments::template::TemplateLoadError;
use crate::core::models::error::GraphError;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request was invalid; nothing was mutated.
    Configuration,
    /// A fragment source could not be found or read.
    Resource,
    /// A handle or label no longer refers to a live node of the right kind.
    Geometry,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid build request: {0}")]
    Config(#[from] ConfigError),

    #[error("Fragment resource error: {0}")]
    Resource(#[from] TemplateLoadError),

    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Resource(TemplateLoadError::UnknownFragment(_)) => ErrorCategory::Configuration,
            Self::Resource(_) => ErrorCategory::Resource,
            Self::Graph(GraphError::LabelExists { .. }) => ErrorCategory::Configuration,
            Self::Graph(_) => ErrorCategory::Geometry,
        }
    }
}
