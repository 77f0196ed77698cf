//! Post-assembly validation
//!
//! Four independent, purely observational checks over the composed
//! configuration: syntax, parameter types, cross-references, and
//! dependencies. Findings are structured records, never errors; overall
//! validity means zero error-severity findings.

mod cross_reference;
mod dependency;
mod syntax;
mod type_check;

pub use cross_reference::CrossReferenceValidator;
pub use dependency::DependencyValidator;
pub use syntax::SyntaxValidator;
pub use type_check::TypeChecker;

use crate::composer::GeneratedConfig;
use serde::{Deserialize, Serialize};

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Which validator produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Syntax,
    Type,
    Reference,
    Dependency,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based line number when known, 0 otherwise
    pub line_number: usize,

    pub module_path: String,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suggestion: String,
}

impl ValidationIssue {
    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            line_number: 0,
            module_path: String::new(),
            kind,
            severity: Severity::Error,
            message: message.into(),
            suggestion: String::new(),
        }
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    pub fn info(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::error(kind, message)
        }
    }

    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    pub fn in_module(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

/// Result of configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no error-severity findings exist
    pub is_valid: bool,

    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub info: Vec<ValidationIssue>,

    pub summary: String,
}

impl ValidationReport {
    pub fn total_issues(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.info.len()
    }
}

/// Orchestrates all validation steps
#[derive(Debug, Default)]
pub struct ConfigValidator {
    syntax: SyntaxValidator,
    types: TypeChecker,
    cross_references: CrossReferenceValidator,
    dependencies: DependencyValidator,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the enabled checks over a composed configuration
    pub fn validate(
        &self,
        config: &GeneratedConfig,
        check_syntax: bool,
        check_types: bool,
        check_references: bool,
        check_dependencies: bool,
    ) -> ValidationReport {
        let mut findings = Vec::new();

        if check_syntax {
            findings.extend(self.syntax.validate(&config.all_lines()));
        }

        if check_types {
            for module in &config.modules {
                findings.extend(
                    self.types
                        .validate(&module.module_path, &module.parameter_assignments),
                );
            }
        }

        if check_references {
            findings.extend(self.cross_references.validate(&config.modules));
        }

        if check_dependencies {
            findings.extend(self.dependencies.validate(&config.modules));
        }

        let errors: Vec<ValidationIssue> = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .cloned()
            .collect();
        let warnings: Vec<ValidationIssue> = findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .cloned()
            .collect();
        let info: Vec<ValidationIssue> = findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .cloned()
            .collect();

        let is_valid = errors.is_empty();
        let summary = summarize(&errors, &warnings, &info);

        ValidationReport {
            is_valid,
            errors,
            warnings,
            info,
            summary,
        }
    }

    /// Run every check
    pub fn validate_all(&self, config: &GeneratedConfig) -> ValidationReport {
        self.validate(config, true, true, true, true)
    }
}

fn summarize(
    errors: &[ValidationIssue],
    warnings: &[ValidationIssue],
    info: &[ValidationIssue],
) -> String {
    if errors.is_empty() && warnings.is_empty() {
        let mut summary = "Configuration validation passed".to_string();
        if !info.is_empty() {
            summary.push_str(&format!(" ({} informational)", info.len()));
        }
        return summary;
    }

    let mut parts = Vec::new();
    if !errors.is_empty() {
        parts.push(format!("{} error(s)", errors.len()));
    }
    if !warnings.is_empty() {
        parts.push(format!("{} warning(s)", warnings.len()));
    }
    format!("Validation found {}", parts.join(", "))
}
