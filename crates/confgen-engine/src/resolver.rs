//! Dependency-based module ordering
//!
//! Kahn's topological sort over the dependency edges declared by
//! templates, with ties among ready modules broken by a fixed priority
//! table and then alphabetically. A dependency cycle degrades to a
//! deterministic alphabetical ordering with a warning; it never aborts
//! the generation.

use confgen_core::AssembledModule;
use std::collections::{BTreeMap, BTreeSet};

/// Priority assigned to paths matching no rule
const DEFAULT_PRIORITY: u8 = 10;

/// Path-fragment priority rule; lower priority orders earlier
struct PriorityRule {
    contains: &'static str,
    excludes: Option<&'static str>,
    priority: u8,
}

/// Ordering priorities, probed top to bottom; first match wins
const PRIORITY_RULES: [PriorityRule; 7] = [
    PriorityRule { contains: "/l2/vlan", excludes: None, priority: 1 },
    PriorityRule { contains: "/slb/real", excludes: None, priority: 2 },
    PriorityRule { contains: "/slb/group", excludes: None, priority: 3 },
    PriorityRule { contains: "/slb/virt", excludes: Some("/service"), priority: 4 },
    PriorityRule { contains: "/slb/virt", excludes: None, priority: 5 },
    PriorityRule { contains: "/slb/ssl", excludes: None, priority: 3 },
    PriorityRule { contains: "/l3/", excludes: None, priority: 1 },
];

/// Ordering priority for a module path; lower runs earlier
pub fn module_priority(module_path: &str) -> u8 {
    for rule in &PRIORITY_RULES {
        if module_path.contains(rule.contains) {
            if let Some(excluded) = rule.excludes {
                if module_path.contains(excluded) {
                    continue;
                }
            }
            return rule.priority;
        }
    }
    DEFAULT_PRIORITY
}

/// Orders assembled modules by their declared dependencies
#[derive(Debug, Default)]
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Order modules dependencies-first
    ///
    /// Returns the ordered modules and any warnings raised (currently
    /// only the cycle fallback). Modules sharing a path keep their
    /// relative order.
    pub fn order_modules(
        &self,
        modules: Vec<AssembledModule>,
    ) -> (Vec<AssembledModule>, Vec<String>) {
        if modules.is_empty() {
            return (modules, Vec::new());
        }

        let paths: BTreeSet<String> = modules.iter().map(|m| m.module_path.clone()).collect();
        let mut warnings = Vec::new();

        let ordered_paths = match self.topological_sort(&modules, &paths) {
            Some(ordered) => ordered,
            None => {
                warnings.push(
                    "Circular dependency detected; using best-effort alphabetical ordering"
                        .to_string(),
                );
                tracing::warn!("circular dependency among modules, falling back to path order");
                paths.iter().cloned().collect()
            }
        };

        // Expand unique paths back to modules, preserving relative order
        // of instances sharing a path
        let mut by_path: BTreeMap<String, Vec<AssembledModule>> = BTreeMap::new();
        for module in modules {
            by_path
                .entry(module.module_path.clone())
                .or_default()
                .push(module);
        }

        let mut ordered = Vec::new();
        for path in ordered_paths {
            if let Some(instances) = by_path.remove(&path) {
                ordered.extend(instances);
            }
        }
        (ordered, warnings)
    }

    /// Kahn's algorithm over requires/required_by edges
    ///
    /// Only edges whose both endpoints are present count; absent targets
    /// are reported separately by [`find_missing_dependencies`].
    fn topological_sort(
        &self,
        modules: &[AssembledModule],
        paths: &BTreeSet<String>,
    ) -> Option<Vec<String>> {
        let mut edges: BTreeSet<(String, String)> = BTreeSet::new();

        for module in modules {
            let Some(template) = &module.metadata.template else {
                continue;
            };
            for requirement in &template.dependencies.requires {
                if paths.contains(requirement) {
                    edges.insert((requirement.clone(), module.module_path.clone()));
                }
            }
            for dependent in &template.dependencies.required_by {
                if paths.contains(dependent) {
                    edges.insert((module.module_path.clone(), dependent.clone()));
                }
            }
        }

        let mut in_degree: BTreeMap<&str, usize> =
            paths.iter().map(|p| (p.as_str(), 0)).collect();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (from, to) in &edges {
            *in_degree.entry(to.as_str()).or_insert(0) += 1;
            dependents.entry(from.as_str()).or_default().push(to.as_str());
        }

        let mut ready: Vec<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(path, _)| *path)
            .collect();
        let mut result = Vec::new();

        while !ready.is_empty() {
            ready.sort_by_key(|path| (module_priority(path), path.to_string()));
            let node = ready.remove(0);
            result.push(node.to_string());

            for dependent in dependents.get(node).cloned().unwrap_or_default() {
                let degree = in_degree.get_mut(dependent)?;
                *degree -= 1;
                if *degree == 0 {
                    ready.push(dependent);
                }
            }
        }

        (result.len() == paths.len()).then_some(result)
    }

    /// Required module paths absent from the generated set
    pub fn find_missing_dependencies(&self, modules: &[AssembledModule]) -> Vec<String> {
        let included: BTreeSet<&str> = modules.iter().map(|m| m.module_path.as_str()).collect();
        let mut missing = BTreeSet::new();

        for module in modules {
            let Some(template) = &module.metadata.template else {
                continue;
            };
            for requirement in &template.dependencies.requires {
                if !included.contains(requirement.as_str()) {
                    missing.insert(requirement.clone());
                }
            }
        }

        missing.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::{AssembledMetadata, TemplateBody, TemplateDependencies, TemplatedModule};

    fn module(path: &str, requires: &[&str]) -> AssembledModule {
        let mut template = TemplatedModule::new(
            path,
            TemplateBody {
                header: path.to_string(),
                body: vec![],
            },
        );
        template.dependencies = TemplateDependencies {
            requires: requires.iter().map(|r| r.to_string()).collect(),
            required_by: Vec::new(),
        };

        AssembledModule {
            module_path: path.to_string(),
            config_lines: vec![path.to_string()],
            parameter_assignments: vec![],
            missing_required: vec![],
            warnings: vec![],
            metadata: AssembledMetadata {
                template: Some(template),
                index: None,
                category: String::new(),
                module_type: Default::default(),
                parent_module: None,
                parent_index: None,
            },
        }
    }

    #[test]
    fn test_chain_orders_dependencies_first() {
        // A requires B, B requires C: emitted as C, B, A
        let modules = vec![
            module("/c/a", &["/c/b"]),
            module("/c/b", &["/c/c"]),
            module("/c/c", &[]),
        ];

        let (ordered, warnings) = DependencyResolver::new().order_modules(modules);
        let paths: Vec<&str> = ordered.iter().map(|m| m.module_path.as_str()).collect();
        assert_eq!(paths, vec!["/c/c", "/c/b", "/c/a"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cycle_degrades_to_alphabetical() {
        let modules = vec![
            module("/c/b", &["/c/a"]),
            module("/c/a", &["/c/b"]),
        ];

        let (ordered, warnings) = DependencyResolver::new().order_modules(modules);
        let paths: Vec<&str> = ordered.iter().map(|m| m.module_path.as_str()).collect();
        assert_eq!(paths, vec!["/c/a", "/c/b"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Circular dependency"));
    }

    #[test]
    fn test_priority_breaks_ties() {
        // No dependencies: ordering falls entirely to the priority table
        let modules = vec![
            module("/c/slb/virt", &[]),
            module("/c/slb/real", &[]),
            module("/c/l2/vlan", &[]),
            module("/c/slb/group", &[]),
        ];

        let (ordered, _) = DependencyResolver::new().order_modules(modules);
        let paths: Vec<&str> = ordered.iter().map(|m| m.module_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/c/l2/vlan", "/c/slb/real", "/c/slb/group", "/c/slb/virt"]
        );
    }

    #[test]
    fn test_service_submodule_orders_after_virt() {
        assert_eq!(module_priority("/c/slb/virt"), 4);
        assert_eq!(module_priority("/c/slb/virt/service"), 5);
        assert_eq!(module_priority("/c/slb/ssl/sslpol"), 3);
        assert_eq!(module_priority("/c/l3/if"), 1);
        assert_eq!(module_priority("/c/sys"), DEFAULT_PRIORITY);
    }

    #[test]
    fn test_duplicate_paths_survive_ordering() {
        let modules = vec![
            module("/c/slb/real", &[]),
            module("/c/slb/real", &[]),
            module("/c/slb/group", &["/c/slb/real"]),
        ];

        let (ordered, _) = DependencyResolver::new().order_modules(modules);
        assert_eq!(ordered.len(), 3);
        assert_eq!(ordered[0].module_path, "/c/slb/real");
        assert_eq!(ordered[1].module_path, "/c/slb/real");
        assert_eq!(ordered[2].module_path, "/c/slb/group");
    }

    #[test]
    fn test_find_missing_dependencies() {
        let modules = vec![module("/c/slb/virt", &["/c/slb/group"])];
        let missing = DependencyResolver::new().find_missing_dependencies(&modules);
        assert_eq!(missing, vec!["/c/slb/group"]);
    }
}
