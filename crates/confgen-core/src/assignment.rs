//! Extracted values and parameter assignments

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete value extracted from a natural-language requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedValue {
    pub value: String,

    /// Value type tag (ipv4_address, port, integer, ...)
    #[serde(rename = "type")]
    pub value_type: String,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,

    /// Surrounding requirement text that led to the extraction
    pub context: String,
}

impl ExtractedValue {
    pub fn new(
        value: impl Into<String>,
        value_type: impl Into<String>,
        confidence: f64,
        context: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            value_type: value_type.into(),
            confidence,
            context: context.into(),
        }
    }
}

/// Where an assignment's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    /// Bound from a value in the requirement text
    User,
    /// Filled from a learned default
    Default,
    /// Rewritten by relationship resolution to reference a sibling module
    Relationship,
}

impl fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignmentSource::User => "user",
            AssignmentSource::Default => "default",
            AssignmentSource::Relationship => "relationship",
        };
        f.write_str(s)
    }
}

/// Assignment of a concrete value to a template parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAssignment {
    pub parameter_name: String,
    pub parameter_type: String,
    pub value: String,
    pub source: AssignmentSource,
    pub confidence: f64,
    pub original_param_key: String,
}

impl ValueAssignment {
    pub fn new(
        parameter_name: impl Into<String>,
        parameter_type: impl Into<String>,
        value: impl Into<String>,
        source: AssignmentSource,
        confidence: f64,
        original_param_key: impl Into<String>,
    ) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            parameter_type: parameter_type.into(),
            value: value.into(),
            source,
            confidence,
            original_param_key: original_param_key.into(),
        }
    }
}
