//! Template definitions mined from historical configurations
//!
//! A `TemplatedModule` is the generalized structure of one module path:
//! a header/body skeleton with `{{placeholder}}` tokens, a schema per
//! parameter, and the statistics learned from the instances it was mined
//! from.

use crate::module::ModuleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema for a single template parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Placeholder name, e.g. `ip_address`
    pub name: String,

    /// Original key from the configuration, e.g. `addr`
    pub original_key: String,

    /// Detected parameter type (ipv4_address, port, flag, ...)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Whether the parameter is mandatory
    pub required: bool,

    /// Validation rule name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,

    /// Enumerated options for flag-like types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Inclusive numeric range for numeric types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(i64, i64)>,

    /// Learned default value, if the majority share reached the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Share of instances carrying the default value
    #[serde(default)]
    pub default_confidence: f64,

    #[serde(default)]
    pub description: String,

    /// First distinct values seen, order preserved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub example_values: Vec<String>,
}

impl ParameterSchema {
    pub fn new(
        name: impl Into<String>,
        original_key: impl Into<String>,
        param_type: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            original_key: original_key.into(),
            param_type: param_type.into(),
            required,
            validation: None,
            options: None,
            range: None,
            default: None,
            default_confidence: 0.0,
            description: String::new(),
            example_values: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<String>, confidence: f64) -> Self {
        self.default = Some(default.into());
        self.default_confidence = confidence;
        self
    }

    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Statistically learned default for one parameter key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LearnedDefault {
    /// The majority value, present only when its share reached the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Share of the majority value among all samples
    pub confidence: f64,

    /// Share per distinct value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub distribution: BTreeMap<String, f64>,

    pub total_samples: usize,
}

/// Line skeleton of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateBody {
    /// Header line, possibly carrying an `{{index}}` placeholder
    pub header: String,

    /// Body lines with `{{name}}` placeholders
    #[serde(default)]
    pub body: Vec<String>,
}

/// Declared inter-module dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateDependencies {
    #[serde(default)]
    pub requires: Vec<String>,

    #[serde(default)]
    pub required_by: Vec<String>,
}

/// Complete template representation of a module path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatedModule {
    pub module_path: String,

    /// Whether instances of this module carry an index
    pub index_required: bool,

    pub module_type: ModuleType,

    /// Semantic category, e.g. `load_balancing`
    pub category: String,

    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub template: TemplateBody,

    /// Parameter schemas keyed by placeholder name
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSchema>,

    /// Learned defaults keyed by original configuration key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub learned_defaults: BTreeMap<String, LearnedDefault>,

    /// Number of instances the template was mined from
    #[serde(default)]
    pub examples_seen: usize,

    /// Configuration variations observed across instances
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<String>,

    #[serde(default)]
    pub dependencies: TemplateDependencies,

    #[serde(default)]
    pub created_at: String,
}

impl TemplatedModule {
    pub fn new(module_path: impl Into<String>, template: TemplateBody) -> Self {
        Self {
            module_path: module_path.into(),
            index_required: false,
            module_type: ModuleType::Standard,
            category: String::new(),
            description: String::new(),
            tags: Vec::new(),
            template,
            parameters: BTreeMap::new(),
            learned_defaults: BTreeMap::new(),
            examples_seen: 0,
            variations: Vec::new(),
            dependencies: TemplateDependencies::default(),
            created_at: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_parameter(mut self, schema: ParameterSchema) -> Self {
        self.parameters.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_dependencies(mut self, dependencies: TemplateDependencies) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Look up a parameter schema by its original configuration key
    pub fn parameter_by_key(&self, original_key: &str) -> Option<&ParameterSchema> {
        self.parameters
            .values()
            .find(|p| p.original_key == original_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_schema_builders() {
        let schema = ParameterSchema::new("vlan_id", "vlan", "vlan_id", true)
            .with_range(1, 4094)
            .with_description("VLAN identifier");

        assert_eq!(schema.range, Some((1, 4094)));
        assert!(schema.required);
        assert_eq!(schema.description, "VLAN identifier");
    }

    #[test]
    fn test_templated_module_parameter_lookup() {
        let template = TemplatedModule::new(
            "/c/l3/if",
            TemplateBody {
                header: "/c/l3/if {{index}}".to_string(),
                body: vec!["addr {{ip_address}}".to_string()],
            },
        )
        .with_parameter(ParameterSchema::new("ip_address", "addr", "ipv4_address", true));

        let schema = template.parameter_by_key("addr").unwrap();
        assert_eq!(schema.name, "ip_address");
        assert!(template.parameter_by_key("mask").is_none());
    }

    #[test]
    fn test_template_json_round_trip() {
        let template = TemplatedModule::new(
            "/c/slb/real",
            TemplateBody {
                header: "/c/slb/real {{index}}".to_string(),
                body: vec!["rip {{real_ip}}".to_string(), "ena".to_string()],
            },
        )
        .with_category("load_balancing");

        let json = serde_json::to_string(&template).unwrap();
        let back: TemplatedModule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }
}
