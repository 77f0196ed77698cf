//! Dependency presence and ordering validation

use super::{IssueKind, ValidationIssue};
use confgen_core::AssembledModule;
use std::collections::BTreeMap;

/// Modules that must be present before their dependents
const REQUIRED_BEFORE: [(&str, &[&str]); 3] = [
    ("/c/slb/virt", &["/c/slb/group"]),
    ("/c/slb/group", &["/c/slb/real"]),
    ("/c/slb/virt/service", &["/c/slb/virt", "/c/slb/group"]),
];

/// Validates the static dependency table against the emitted modules
#[derive(Debug, Default)]
pub struct DependencyValidator;

impl DependencyValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, modules: &[AssembledModule]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let positions: BTreeMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(position, module)| (module.module_path.as_str(), position))
            .collect();

        for (position, module) in modules.iter().enumerate() {
            let Some((_, dependencies)) = REQUIRED_BEFORE
                .iter()
                .find(|(path, _)| *path == module.module_path)
            else {
                continue;
            };

            for dependency in *dependencies {
                match positions.get(dependency) {
                    None => issues.push(
                        ValidationIssue::error(
                            IssueKind::Dependency,
                            format!("Missing required dependency: {dependency}"),
                        )
                        .in_module(&module.module_path)
                        .with_suggestion(format!("Add the {dependency} module configuration")),
                    ),
                    Some(dependency_position) if *dependency_position > position => issues.push(
                        ValidationIssue::warning(
                            IssueKind::Dependency,
                            format!(
                                "Dependency {dependency} appears after {}",
                                module.module_path
                            ),
                        )
                        .in_module(&module.module_path)
                        .with_suggestion(format!(
                            "Move {dependency} before {}",
                            module.module_path
                        )),
                    ),
                    Some(_) => {}
                }
            }
        }

        issues
    }
}
