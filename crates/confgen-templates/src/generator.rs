//! Template generation from mined instances
//!
//! Generalizes a group of module instances into a `TemplatedModule`:
//! the first instance provides the line skeleton, the pattern set provides
//! parameter schemas, and the annotation provides placeholder names and
//! semantic metadata.

use crate::annotation::Annotation;
use crate::error::{Result, TemplateError};
use crate::patterns::PatternSet;
use confgen_core::{ModuleBlock, ModuleType, ParameterSchema, TemplateBody, TemplatedModule};
use std::collections::BTreeMap;

/// Validation rule names per detected type
const VALIDATION_RULES: [(&str, &str); 7] = [
    ("ipv4_address", "ipv4_address"),
    ("ipv4_netmask", "ipv4_netmask"),
    ("ipv6_address", "ipv6_address"),
    ("port", "port_number"),
    ("vlan_id", "vlan_id"),
    ("integer", "positive_integer"),
    ("mac_address", "mac_address"),
];

/// Generates templates from parsed modules and their patterns
#[derive(Debug, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a complete template for one module path
    pub fn generate(
        &self,
        module_path: &str,
        modules: &[ModuleBlock],
        patterns: &PatternSet,
        annotation: &Annotation,
    ) -> Result<TemplatedModule> {
        let first = modules
            .first()
            .ok_or_else(|| TemplateError::EmptyModuleGroup(module_path.to_string()))?;

        let index_required = first.index.is_some();
        let parameters = self.build_parameter_schemas(patterns, annotation);

        let template = match first.module_type {
            ModuleType::MultilineCert => cert_template(module_path),
            ModuleType::MultilineScript => script_template(module_path),
            ModuleType::Action => action_template(first, &parameters),
            _ => standard_template(module_path, first, &parameters, index_required),
        };

        let mut templated = TemplatedModule::new(module_path, template);
        templated.index_required = index_required;
        templated.module_type = first.module_type;
        templated.category = annotation.category.clone();
        templated.description = annotation.description.clone();
        templated.tags = annotation.tags.clone();
        templated.parameters = parameters;
        templated.examples_seen = modules.len();
        templated.variations = detect_variations(modules);
        templated.dependencies = annotation.dependencies.clone();

        log::debug!(
            "generated template for {module_path}: {} parameters, {} instances",
            templated.parameters.len(),
            templated.examples_seen
        );

        Ok(templated)
    }

    fn build_parameter_schemas(
        &self,
        patterns: &PatternSet,
        annotation: &Annotation,
    ) -> BTreeMap<String, ParameterSchema> {
        let mut schemas = BTreeMap::new();

        for (key, pattern) in &patterns.patterns {
            let placeholder = annotation.placeholder_for(key);

            let mut schema = ParameterSchema::new(
                placeholder.clone(),
                key.clone(),
                pattern.detected_type.clone(),
                pattern.is_required,
            )
            .with_description(annotation.description_for(key));

            schema.validation = VALIDATION_RULES
                .iter()
                .find(|(t, _)| *t == pattern.detected_type)
                .map(|(_, rule)| rule.to_string());
            schema.example_values = pattern.example_values.clone();

            match pattern.detected_type.as_str() {
                "flag" | "ip_version" => {
                    let mut options: Vec<String> = Vec::new();
                    for value in &pattern.values {
                        if !options.contains(value) {
                            options.push(value.clone());
                        }
                    }
                    schema.options = Some(options);
                }
                "vlan_id" => schema.range = Some((1, 4094)),
                "port" => schema.range = Some((1, 65535)),
                _ => {}
            }

            schemas.insert(placeholder, schema);
        }

        schemas
    }
}

fn standard_template(
    module_path: &str,
    first: &ModuleBlock,
    parameters: &BTreeMap<String, ParameterSchema>,
    index_required: bool,
) -> TemplateBody {
    let header = if index_required {
        format!("{module_path} {{{{index}}}}")
    } else {
        module_path.to_string()
    };

    let mut body = Vec::new();
    for line in &first.sub_lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(char::is_whitespace) {
            Some((key, _)) => match placeholder_for_key(key, parameters) {
                Some(placeholder) => body.push(format!("{key} {{{{{placeholder}}}}}")),
                None => body.push(line.to_string()),
            },
            None => match placeholder_for_key(line, parameters) {
                Some(placeholder) => body.push(format!("{{{{{placeholder}}}}}")),
                None => body.push(line.to_string()),
            },
        }
    }

    TemplateBody { header, body }
}

fn cert_template(module_path: &str) -> TemplateBody {
    TemplateBody {
        header: format!("{module_path} \"{{{{certificate_name}}}}\" text"),
        body: vec!["{{certificate_content}}".to_string()],
    }
}

fn script_template(module_path: &str) -> TemplateBody {
    TemplateBody {
        header: format!("{module_path} {{{{script_id}}}}"),
        body: vec![
            "{{script_status}}".to_string(),
            "import text".to_string(),
            "{{script_content}}".to_string(),
            "-----END".to_string(),
        ],
    }
}

fn action_template(
    first: &ModuleBlock,
    parameters: &BTreeMap<String, ParameterSchema>,
) -> TemplateBody {
    let mut header = first
        .raw_lines
        .first()
        .cloned()
        .unwrap_or_else(|| first.module_path.clone());

    for (name, schema) in parameters {
        for example in &schema.example_values {
            if header.contains(example.as_str()) {
                header = header.replace(example.as_str(), &format!("{{{{{name}}}}}"));
            }
        }
    }

    TemplateBody {
        header,
        body: Vec::new(),
    }
}

fn placeholder_for_key(
    key: &str,
    parameters: &BTreeMap<String, ParameterSchema>,
) -> Option<String> {
    parameters
        .values()
        .find(|p| p.original_key == key)
        .map(|p| p.name.clone())
}

/// Observed configuration variations across instances
fn detect_variations(modules: &[ModuleBlock]) -> Vec<String> {
    let mut all_keys: Vec<String> = Vec::new();
    for module in modules {
        for line in &module.sub_lines {
            if let Some(key) = line.split_whitespace().next() {
                if !all_keys.contains(&key.to_string()) {
                    all_keys.push(key.to_string());
                }
            }
        }
    }

    let mut variations: Vec<String> = Vec::new();
    let mut push = |v: &str| {
        if !variations.contains(&v.to_string()) {
            variations.push(v.to_string());
        }
    };

    for module in modules {
        let module_keys: Vec<&str> = module
            .sub_lines
            .iter()
            .filter_map(|l| l.split_whitespace().next())
            .collect();

        if module_keys.contains(&"peer") {
            push("with_peer");
        }
        if module_keys.contains(&"broad") {
            push("with_broadcast");
        }
        if (module_keys.len() as f64) < all_keys.len() as f64 * 0.5 {
            push("minimal");
        } else if (module_keys.len() as f64) > all_keys.len() as f64 * 0.8 {
            push("full");
        }
    }

    if variations.is_empty() {
        variations.push("standard".to_string());
    }
    variations.sort();
    variations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::PlaceholderHint;
    use crate::patterns::PatternExtractor;

    fn instance(index: Option<&str>, sub_lines: &[&str]) -> ModuleBlock {
        let mut block = ModuleBlock::new(1);
        block.module_path = "/c/l3/if".to_string();
        block.index = index.map(|s| s.to_string());
        block.sub_lines = sub_lines.iter().map(|s| s.to_string()).collect();
        block
    }

    fn annotation_with_hints() -> Annotation {
        let mut annotation = Annotation {
            category: "network_layer3".to_string(),
            description: "Layer 3 interface configuration".to_string(),
            tags: vec!["layer3".to_string(), "ip".to_string()],
            ..Annotation::default()
        };
        for (key, name) in [
            ("ena", "interface_enabled"),
            ("ipver", "ip_version"),
            ("addr", "ip_address"),
            ("mask", "subnet_mask"),
            ("vlan", "vlan_id"),
        ] {
            annotation.parameter_hints.insert(
                key.to_string(),
                PlaceholderHint {
                    name: name.to_string(),
                    description: format!("Value for {key}"),
                },
            );
        }
        annotation
    }

    #[test]
    fn test_generate_standard_template() {
        let modules = vec![
            instance(Some("1"), &["ena", "ipver v4", "addr 10.0.0.1", "mask 255.255.255.0", "vlan 818"]),
            instance(Some("2"), &["ena", "ipver v4", "addr 10.0.0.2", "mask 255.255.255.0", "vlan 820"]),
        ];
        let patterns = PatternExtractor::new().extract(&modules);

        let template = TemplateGenerator::new()
            .generate("/c/l3/if", &modules, &patterns, &annotation_with_hints())
            .unwrap();

        assert!(template.index_required);
        assert_eq!(template.template.header, "/c/l3/if {{index}}");
        assert_eq!(
            template.template.body,
            vec![
                "{{interface_enabled}}",
                "ipver {{ip_version}}",
                "addr {{ip_address}}",
                "mask {{subnet_mask}}",
                "vlan {{vlan_id}}",
            ]
        );
        assert_eq!(template.examples_seen, 2);
        assert_eq!(template.category, "network_layer3");
        assert_eq!(template.parameters["vlan_id"].range, Some((1, 4094)));
        assert_eq!(
            template.parameters["ip_version"].options,
            Some(vec!["v4".to_string()])
        );
    }

    #[test]
    fn test_fallback_placeholder_name() {
        let modules = vec![instance(None, &["timeout 30"])];
        let patterns = PatternExtractor::new().extract(&modules);

        let template = TemplateGenerator::new()
            .generate("/c/sys", &modules, &patterns, &Annotation::default())
            .unwrap();

        assert!(template.parameters.contains_key("timeout_value"));
        assert_eq!(template.template.header, "/c/sys");
        assert_eq!(template.template.body, vec!["timeout {{timeout_value}}"]);
    }

    #[test]
    fn test_cert_template() {
        let mut cert = instance(None, &["import cert \"c1\" text"]);
        cert.module_type = ModuleType::MultilineCert;
        cert.module_path = "/c/slb/ssl/certs/srvrcert".to_string();

        let patterns = PatternExtractor::new().extract(&[]);
        let template = TemplateGenerator::new()
            .generate(
                "/c/slb/ssl/certs/srvrcert",
                std::slice::from_ref(&cert),
                &patterns,
                &Annotation::default(),
            )
            .unwrap();

        assert_eq!(
            template.template.header,
            "/c/slb/ssl/certs/srvrcert \"{{certificate_name}}\" text"
        );
        assert_eq!(template.template.body, vec!["{{certificate_content}}"]);
    }

    #[test]
    fn test_empty_group_is_an_error() {
        let patterns = PatternExtractor::new().extract(&[]);
        let result = TemplateGenerator::new().generate(
            "/c/sys",
            &[],
            &patterns,
            &Annotation::default(),
        );
        assert!(matches!(result, Err(TemplateError::EmptyModuleGroup(_))));
    }

    #[test]
    fn test_variation_detection() {
        let modules = vec![
            instance(Some("1"), &["ena", "addr 10.0.0.1", "mask 255.255.255.0", "peer 10.0.0.2"]),
            instance(Some("2"), &["ena"]),
        ];
        let variations = detect_variations(&modules);
        assert!(variations.contains(&"with_peer".to_string()));
        assert!(variations.contains(&"minimal".to_string()));
    }
}
