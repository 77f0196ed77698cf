//! Query helpers and statistics over parsed module blocks

use confgen_core::{ModuleBlock, ModuleType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Summary statistics for one parse run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_modules: usize,
    pub by_type: BTreeMap<String, usize>,
    pub unique_paths: usize,
    pub indexed_modules: usize,
}

impl ParseStats {
    pub fn from_modules(modules: &[ModuleBlock]) -> Self {
        let mut by_type = BTreeMap::new();
        for module in modules {
            *by_type.entry(module.module_type.to_string()).or_insert(0) += 1;
        }

        let unique_paths: BTreeSet<&str> =
            modules.iter().map(|m| m.module_path.as_str()).collect();

        Self {
            total_modules: modules.len(),
            by_type,
            unique_paths: unique_paths.len(),
            indexed_modules: modules.iter().filter(|m| m.index.is_some()).count(),
        }
    }
}

/// All modules matching a specific path
pub fn modules_by_path<'a>(modules: &'a [ModuleBlock], path: &str) -> Vec<&'a ModuleBlock> {
    modules.iter().filter(|m| m.module_path == path).collect()
}

/// All modules of a specific type
pub fn modules_by_type(modules: &[ModuleBlock], module_type: ModuleType) -> Vec<&ModuleBlock> {
    modules
        .iter()
        .filter(|m| m.module_type == module_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_parser::ConfigParser;

    #[test]
    fn test_stats() {
        let config = "/c/slb/real 1\n\trip 10.0.0.1\n/c/slb/real 2\n\trip 10.0.0.2\n/c/slb\n";
        let modules = ConfigParser::new().parse(config);
        let stats = ParseStats::from_modules(&modules);

        assert_eq!(stats.total_modules, 3);
        assert_eq!(stats.unique_paths, 2);
        assert_eq!(stats.indexed_modules, 2);
        assert_eq!(stats.by_type.get("standard"), Some(&2));
        assert_eq!(stats.by_type.get("empty"), Some(&1));
    }

    #[test]
    fn test_modules_by_path() {
        let config = "/c/slb/real 1\n\trip 10.0.0.1\n/c/slb/group 1\n\tadd 1\n";
        let modules = ConfigParser::new().parse(config);

        assert_eq!(modules_by_path(&modules, "/c/slb/real").len(), 1);
        assert_eq!(modules_by_path(&modules, "/c/slb/virt").len(), 0);
    }
}
