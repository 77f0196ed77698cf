//! Final configuration composition

use confgen_core::AssembledModule;
use serde::{Deserialize, Serialize};

/// Metadata about a composed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigMetadata {
    pub total_modules: usize,
    pub total_lines: usize,
    /// True when composition raised no warnings
    pub clean: bool,
}

/// A complete generated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedConfig {
    /// Ordered assembled modules
    pub modules: Vec<AssembledModule>,

    pub header: String,
    pub footer: String,
    pub timestamp: String,

    /// The requirement the configuration was generated from
    pub requirements_summary: String,

    pub warnings: Vec<String>,
    pub metadata: ConfigMetadata,
}

impl GeneratedConfig {
    /// Render the configuration as CLI text
    pub fn to_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        if !self.header.is_empty() {
            lines.push(self.header.clone());
        }

        for module in &self.modules {
            lines.push(String::new());
            lines.extend(module.config_lines.iter().cloned());
        }

        if !self.footer.is_empty() {
            lines.push(String::new());
            lines.push(self.footer.clone());
        }

        lines.join("\n")
    }

    /// All rendered lines, used by the syntax validator
    pub fn all_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        lines.extend(self.header.split('\n').map(|l| l.to_string()));
        for module in &self.modules {
            lines.extend(module.config_lines.iter().cloned());
            lines.push(String::new());
        }
        lines.extend(self.footer.split('\n').map(|l| l.to_string()));
        lines
    }
}

/// Composes ordered modules into a final configuration
#[derive(Debug)]
pub struct ConfigComposer {
    include_header: bool,
    include_footer: bool,
}

impl Default for ConfigComposer {
    fn default() -> Self {
        Self {
            include_header: true,
            include_footer: true,
        }
    }
}

impl ConfigComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_header(mut self) -> Self {
        self.include_header = false;
        self
    }

    pub fn without_footer(mut self) -> Self {
        self.include_footer = false;
        self
    }

    /// Compose the final configuration from ordered modules
    pub fn compose(&self, modules: Vec<AssembledModule>, requirement: &str) -> GeneratedConfig {
        let timestamp = chrono::Utc::now().to_rfc3339();

        let header = if self.include_header {
            let mut header = format!("# Generated Configuration\n# Timestamp: {timestamp}\n");
            if !requirement.is_empty() {
                header.push_str(&format!("# Requirement: {requirement}\n"));
            }
            header.push('#');
            header
        } else {
            String::new()
        };

        let footer = if self.include_footer {
            "apply\nsave".to_string()
        } else {
            String::new()
        };

        let mut warnings = Vec::new();
        for module in &modules {
            warnings.extend(module.warnings.iter().cloned());
            if !module.missing_required.is_empty() {
                warnings.push(format!(
                    "{}: Missing required parameters: {}",
                    module.module_path,
                    module.missing_required.join(", ")
                ));
            }
        }

        let metadata = ConfigMetadata {
            total_modules: modules.len(),
            total_lines: modules.iter().map(|m| m.config_lines.len()).sum(),
            clean: warnings.is_empty(),
        };

        tracing::debug!(
            "composed configuration: {} modules, {} lines, {} warnings",
            metadata.total_modules,
            metadata.total_lines,
            warnings.len()
        );

        GeneratedConfig {
            modules,
            header,
            footer,
            timestamp,
            requirements_summary: requirement.to_string(),
            warnings,
            metadata,
        }
    }
}
