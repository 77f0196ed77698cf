//! Parsed configuration module blocks
//!
//! A `ModuleBlock` is one unit of a hierarchical CLI-style configuration
//! file: a path-addressed header line plus the indented lines that belong
//! to it, or an action command, or a multi-line certificate/script import.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of configuration module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleType {
    /// Regular config module with sub-lines
    Standard,
    /// Command-style module (e.g. `/c/l2/stg 1/clear`)
    Action,
    /// Certificate import with embedded PEM content
    MultilineCert,
    /// Script import with embedded script content
    MultilineScript,
    /// Module declaration with no content
    Empty,
}

impl Default for ModuleType {
    fn default() -> Self {
        ModuleType::Standard
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModuleType::Standard => "standard",
            ModuleType::Action => "action",
            ModuleType::MultilineCert => "multiline_cert",
            ModuleType::MultilineScript => "multiline_script",
            ModuleType::Empty => "empty",
        };
        f.write_str(s)
    }
}

/// Device deployment variant, detected once per configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormFactor {
    #[serde(rename = "VA")]
    Va,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "VX")]
    Vx,
    #[serde(rename = "vADC")]
    Vadc,
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FormFactor::Va => "VA",
            FormFactor::Sa => "SA",
            FormFactor::Vx => "VX",
            FormFactor::Vadc => "vADC",
        };
        f.write_str(s)
    }
}

/// Hypervisor a VA module is specific to; `None` means all hypervisors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hypervisor {
    Aws,
    Azure,
    Gcp,
}

/// A single parsed configuration module block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBlock {
    /// Slash-delimited module path, e.g. `/c/l3/if`
    pub module_path: String,

    /// Instance identifier: numeric or a (possibly multi-word) name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Original lines, preserved verbatim for fidelity
    pub raw_lines: Vec<String>,

    /// Normalized (trimmed) sub-lines
    pub sub_lines: Vec<String>,

    pub module_type: ModuleType,

    /// 1-based position of the header line in the source
    pub start_line: usize,

    /// 1-based position of the last line consumed by this block
    pub end_line: usize,

    /// Opaque multi-line content (certificate/script), bounded by the
    /// BEGIN/END markers of the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline_content: Option<String>,

    /// Metadata for multi-line content, e.g. certificate name/type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multiline_metadata: BTreeMap<String, String>,

    /// Parameters of an action command
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_params: Vec<String>,

    /// Form factor of the source file; identical for every block of one parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,

    /// Hypervisor restriction, only meaningful for VA form factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypervisor_support: Option<Hypervisor>,
}

impl ModuleBlock {
    /// Create an empty block starting at the given source line
    pub fn new(start_line: usize) -> Self {
        Self {
            module_path: String::new(),
            index: None,
            raw_lines: Vec::new(),
            sub_lines: Vec::new(),
            module_type: ModuleType::Standard,
            start_line,
            end_line: start_line,
            multiline_content: None,
            multiline_metadata: BTreeMap::new(),
            action_params: Vec::new(),
            form_factor: None,
            hypervisor_support: None,
        }
    }

    /// True when the block carries neither sub-lines nor multi-line content
    pub fn is_contentless(&self) -> bool {
        self.sub_lines.is_empty() && self.multiline_content.is_none()
    }
}

impl fmt::Display for ModuleBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.index {
            Some(index) => write!(f, "<{} {} ({})>", self.module_path, index, self.module_type),
            None => write!(f, "<{} ({})>", self.module_path, self.module_type),
        }
    }
}
