//! Semantic annotation of a mined module group
//!
//! Annotations are produced by an external labeling service (or a
//! deterministic heuristic fallback) and feed the template generator with
//! human-meaningful placeholder names, a category, and declared
//! dependencies.

use confgen_core::TemplateDependencies;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder naming hint for one configuration key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderHint {
    /// Placeholder name, e.g. `ip_address` for the key `addr`
    pub name: String,
    pub description: String,
}

/// Semantic labels for one module path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Annotation {
    pub category: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Hints keyed by original configuration key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_hints: BTreeMap<String, PlaceholderHint>,

    #[serde(default)]
    pub dependencies: TemplateDependencies,
}

impl Annotation {
    /// Placeholder name for a key, falling back to `<key>_value`
    pub fn placeholder_for(&self, key: &str) -> String {
        self.parameter_hints
            .get(key)
            .map(|h| h.name.clone())
            .unwrap_or_else(|| format!("{key}_value"))
    }

    /// Description for a key, falling back to a generic one
    pub fn description_for(&self, key: &str) -> String {
        self.parameter_hints
            .get(key)
            .map(|h| h.description.clone())
            .unwrap_or_else(|| format!("Value for {key}"))
    }
}
