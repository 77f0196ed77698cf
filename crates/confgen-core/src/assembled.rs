//! Assembled module output types

use crate::assignment::ValueAssignment;
use crate::module::ModuleType;
use crate::template::TemplatedModule;
use serde::{Deserialize, Serialize};

/// Metadata carried by an assembled module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssembledMetadata {
    /// The originating template, when the module came from retrieval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplatedModule>,

    /// Numeric instance index allocated during generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub module_type: ModuleType,

    /// Parent module path, for synthesized sub-modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_module: Option<String>,

    /// Parent module index, for synthesized sub-modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<u32>,
}

/// A template with all resolvable placeholders filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledModule {
    pub module_path: String,

    /// Header plus surviving body lines, in template order
    pub config_lines: Vec<String>,

    pub parameter_assignments: Vec<ValueAssignment>,

    /// Required parameters that could not be filled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default)]
    pub metadata: AssembledMetadata,
}

impl AssembledModule {
    /// True when every required parameter was filled
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }

    /// Look up an assignment by parameter name
    pub fn assignment(&self, parameter_name: &str) -> Option<&ValueAssignment> {
        self.parameter_assignments
            .iter()
            .find(|a| a.parameter_name == parameter_name)
    }
}
