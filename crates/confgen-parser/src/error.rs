//! Parser error types

use thiserror::Error;

/// Parser error
///
/// Structural anomalies inside the text (orphan sub-lines, unterminated
/// multi-line blocks) are tolerated silently and never surface here; only
/// problems reading the source produce an error.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
