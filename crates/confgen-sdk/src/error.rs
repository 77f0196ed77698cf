//! SDK error types

use thiserror::Error;

/// SDK error
#[derive(Error, Debug)]
pub enum SdkError {
    /// Retrieval boundary failure (embedding, vector store, annotation)
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] confgen_retrieval::RetrievalError),

    /// Corpus mining or template storage failure
    #[error("Template error: {0}")]
    Template(#[from] confgen_templates::TemplateError),

    /// Configuration parsing failure
    #[error("Parse error: {0}")]
    Parse(#[from] confgen_parser::ParseError),

    /// Engine failure
    #[error("Engine error: {0}")]
    Engine(#[from] confgen_engine::EngineError),

    /// No templates matched the requirement
    #[error("No templates found for requirement")]
    NoTemplatesFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SdkError>;
