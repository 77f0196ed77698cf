//! Cross-reference validation between modules

use super::{IssueKind, ValidationIssue};
use confgen_core::AssembledModule;
use std::collections::{BTreeMap, BTreeSet};

/// Validates that referencing parameters point at existing instances
#[derive(Debug, Default)]
pub struct CrossReferenceValidator;

impl CrossReferenceValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, modules: &[AssembledModule]) -> Vec<ValidationIssue> {
        let indices = build_module_indices(modules);
        let mut issues = Vec::new();

        for module in modules {
            match module.module_path.as_str() {
                "/c/slb/group" => self.check_reference(
                    module,
                    "group_member",
                    "/c/slb/real",
                    "Group references non-existent real server",
                    &indices,
                    &mut issues,
                ),
                "/c/slb/virt" => self.check_reference(
                    module,
                    "service_group_id",
                    "/c/slb/group",
                    "VIP references non-existent group",
                    &indices,
                    &mut issues,
                ),
                _ => {}
            }
        }

        issues
    }

    fn check_reference(
        &self,
        module: &AssembledModule,
        param_name: &str,
        target_path: &str,
        description: &str,
        indices: &BTreeMap<String, BTreeSet<u32>>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for assignment in &module.parameter_assignments {
            if assignment.parameter_name != param_name {
                continue;
            }
            let Ok(reference) = assignment.value.parse::<u32>() else {
                continue;
            };

            let known = indices.get(target_path);
            if known.map(|set| set.contains(&reference)).unwrap_or(false) {
                continue;
            }

            issues.push(
                ValidationIssue::error(
                    IssueKind::Reference,
                    format!("{description}: {reference}"),
                )
                .in_module(&module.module_path)
                .with_suggestion(format!("Ensure {target_path} {reference} is defined")),
            );
        }
    }
}

/// Instance indices present per module path
fn build_module_indices(modules: &[AssembledModule]) -> BTreeMap<String, BTreeSet<u32>> {
    let mut indices: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    for module in modules {
        if let Some(index) = module.metadata.index {
            indices
                .entry(module.module_path.clone())
                .or_default()
                .insert(index);
        }
    }
    indices
}
