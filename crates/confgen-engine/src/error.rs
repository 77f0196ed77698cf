//! Engine error types

use thiserror::Error;

/// Engine error
///
/// Matching and assembly shortfalls are reported as warnings on the
/// produced modules, not as errors; this type covers genuine misuse of
/// the engine API.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A template is structurally unusable
    #[error("Invalid template for {module_path}: {message}")]
    InvalidTemplate {
        module_path: String,
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
