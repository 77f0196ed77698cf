//! Error types for confgen Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
