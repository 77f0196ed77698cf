//! Error types for corpus mining and template storage

use thiserror::Error;

/// Template mining/storage error
#[derive(Error, Debug)]
pub enum TemplateError {
    /// I/O error while reading or writing a store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No module instances were provided for mining
    #[error("No instances for module path: {0}")]
    EmptyModuleGroup(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
