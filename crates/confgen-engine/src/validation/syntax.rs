//! Syntax validation over rendered configuration lines

use super::{IssueKind, ValidationIssue};
use regex::Regex;
use std::sync::OnceLock;

/// Parameter names whose values must be IPv4 literals
const IP_PARAM_NAMES: [&str; 5] = ["vip", "rip", "ip", "gateway", "mask"];

/// Parameter names whose values must be port numbers
const PORT_PARAM_NAMES: [&str; 3] = ["port", "rport", "sport"];

/// Commands allowed at top level outside any module
const RESERVED_COMMANDS: [&str; 3] = ["apply", "save", "exit"];

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap())
}

/// Validates configuration syntax line by line
#[derive(Debug, Default)]
pub struct SyntaxValidator;

impl SyntaxValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, lines: &[String]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut current_module: Option<String> = None;

        for (offset, line) in lines.iter().enumerate() {
            let line_number = offset + 1;
            let stripped = line.trim();

            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }

            if stripped.starts_with("/c/") {
                current_module = Some(stripped.to_string());
                self.check_module_path(line_number, stripped, &mut issues);
            } else if line.starts_with('\t') || line.starts_with("    ") {
                match &current_module {
                    Some(module) => {
                        self.check_parameter(line_number, module, stripped, &mut issues)
                    }
                    None => issues.push(
                        ValidationIssue::error(
                            IssueKind::Syntax,
                            "Parameter without module context",
                        )
                        .at_line(line_number)
                        .with_suggestion("Ensure the parameter is under a module path"),
                    ),
                }
            } else if RESERVED_COMMANDS.contains(&stripped) {
                continue;
            } else if stripped.contains(' ') {
                let module = current_module.clone().unwrap_or_else(|| "root".to_string());
                self.check_parameter(line_number, &module, stripped, &mut issues);
            }
        }

        issues
    }

    fn check_module_path(
        &self,
        line_number: usize,
        module_path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        const INVALID_CHARS: [char; 5] = ['\\', '<', '>', '|', '\''];
        if module_path.chars().any(|c| INVALID_CHARS.contains(&c)) {
            issues.push(
                ValidationIssue::error(IssueKind::Syntax, "Module path contains invalid characters")
                    .at_line(line_number)
                    .in_module(module_path)
                    .with_suggestion("Remove special characters from the path"),
            );
        }
    }

    fn check_parameter(
        &self,
        line_number: usize,
        module_path: &str,
        param_line: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if let Some(captures) = placeholder_re().captures(param_line) {
            let placeholder = &captures[1];
            issues.push(
                ValidationIssue::error(
                    IssueKind::Syntax,
                    format!("Unreplaced placeholder: {placeholder}"),
                )
                .at_line(line_number)
                .in_module(module_path)
                .with_suggestion(format!("Provide a value for the {placeholder} parameter")),
            );
        }

        let mut parts = param_line.split_whitespace();
        let Some(param_name) = parts.next() else {
            return;
        };
        let param_value = parts.next().unwrap_or("");

        if IP_PARAM_NAMES.contains(&param_name) && !param_value.is_empty() {
            if !is_valid_ipv4(param_value) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Type,
                        format!("Invalid IP address format: {param_value}"),
                    )
                    .at_line(line_number)
                    .in_module(module_path)
                    .with_suggestion("Use the format: xxx.xxx.xxx.xxx"),
                );
            }
        }

        if PORT_PARAM_NAMES.contains(&param_name) && !param_value.is_empty() {
            if !is_valid_port(param_value) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Type,
                        format!("Invalid port number: {param_value}"),
                    )
                    .at_line(line_number)
                    .in_module(module_path)
                    .with_suggestion("Port must be between 1 and 65535"),
                );
            }
        }
    }
}

fn is_valid_ipv4(value: &str) -> bool {
    let octets: Vec<&str> = value.split('.').collect();
    octets.len() == 4
        && octets
            .iter()
            .all(|o| !o.is_empty() && o.len() <= 3 && o.parse::<u32>().map(|n| n <= 255).unwrap_or(false))
}

fn is_valid_port(value: &str) -> bool {
    value
        .parse::<i64>()
        .map(|n| (1..=65535).contains(&n))
        .unwrap_or(false)
}
