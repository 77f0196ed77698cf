//! Parameter type checking against the known-parameter table

use super::{IssueKind, ValidationIssue};
use confgen_core::ValueAssignment;

/// Known parameter names and their expected types
const PARAM_TYPES: [(&str, &str); 17] = [
    ("vip", "ipv4_address"),
    ("rip", "ipv4_address"),
    ("ip", "ipv4_address"),
    ("virtual_ip_address", "ipv4_address"),
    ("real_ip", "ipv4_address"),
    ("port", "port"),
    ("rport", "port"),
    ("sport", "port"),
    ("real_port", "port"),
    ("group", "integer"),
    ("add", "integer"),
    ("index", "integer"),
    ("service_group_id", "integer"),
    ("group_member", "integer"),
    ("enable_status", "boolean"),
    ("ena", "boolean"),
    ("dis", "boolean"),
];

/// Accepted boolean spellings
const BOOLEAN_VALUES: [&str; 8] = ["true", "false", "ena", "dis", "0", "1", "on", "off"];

/// Validates assignment values against the known-parameter type table
#[derive(Debug, Default)]
pub struct TypeChecker;

impl TypeChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        module_path: &str,
        assignments: &[ValueAssignment],
    ) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for assignment in assignments {
            let known_type = PARAM_TYPES
                .iter()
                .find(|(name, _)| *name == assignment.parameter_name)
                .map(|(_, param_type)| *param_type);

            let Some(param_type) = known_type else {
                issues.push(
                    ValidationIssue::info(
                        IssueKind::Type,
                        format!(
                            "Unknown parameter type for: {}",
                            assignment.parameter_name
                        ),
                    )
                    .in_module(module_path)
                    .with_suggestion("This parameter is not type-checked"),
                );
                continue;
            };

            if !check_value(param_type, &assignment.value) {
                issues.push(
                    ValidationIssue::error(
                        IssueKind::Type,
                        format!(
                            "Invalid {param_type} for {}: {}",
                            assignment.parameter_name, assignment.value
                        ),
                    )
                    .in_module(module_path)
                    .with_suggestion(format!("Expected {param_type} format")),
                );
            }
        }

        issues
    }
}

fn check_value(param_type: &str, value: &str) -> bool {
    match param_type {
        "ipv4_address" => {
            let octets: Vec<&str> = value.split('.').collect();
            octets.len() == 4
                && octets
                    .iter()
                    .all(|o| o.parse::<u32>().map(|n| n <= 255).unwrap_or(false))
        }
        "port" => value
            .parse::<i64>()
            .map(|n| (1..=65535).contains(&n))
            .unwrap_or(false),
        "integer" => value.parse::<i64>().is_ok(),
        "boolean" => BOOLEAN_VALUES.contains(&value.to_lowercase().as_str()),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Severity;
    use confgen_core::AssignmentSource;

    fn assignment(name: &str, value: &str) -> ValueAssignment {
        ValueAssignment::new(name, "string", value, AssignmentSource::User, 0.9, name)
    }

    #[test]
    fn test_valid_values_pass() {
        let issues = TypeChecker::new().validate(
            "/c/slb/virt",
            &[
                assignment("vip", "10.0.0.1"),
                assignment("port", "443"),
                assignment("group", "1"),
                assignment("ena", "ena"),
            ],
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_invalid_ip_is_an_error() {
        let issues =
            TypeChecker::new().validate("/c/slb/virt", &[assignment("vip", "999.0.0.1")]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let issues = TypeChecker::new().validate("/c/slb/virt", &[assignment("rport", "0")]);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_unknown_parameter_is_informational() {
        let issues =
            TypeChecker::new().validate("/c/sys", &[assignment("idle_timeout", "60")]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }
}
