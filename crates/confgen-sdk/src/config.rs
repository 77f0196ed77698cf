//! Generator configuration

use serde::{Deserialize, Serialize};

/// Rounds of missing-dependency retrieval during generation
pub const MAX_DEPENDENCY_ITERATIONS: usize = 5;

/// Similarity assigned to templates pulled in as required dependencies
pub const DEPENDENCY_SIMILARITY: f64 = 0.85;

/// Configuration for the generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of templates to retrieve per requirement
    pub top_k: usize,

    /// Auto-fill parameters whose learned default is high-confidence
    pub auto_fill_defaults: bool,

    /// Emit the comment header
    pub include_header: bool,

    /// Emit the apply/save footer
    pub include_footer: bool,

    /// Run validation after composition
    pub validate: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            auto_fill_defaults: true,
            include_header: true,
            include_footer: true,
            validate: true,
        }
    }
}

impl GeneratorConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }
}
