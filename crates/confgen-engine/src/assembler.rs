//! Template assembly: filling skeletons with assigned values

use confgen_core::{
    AssembledMetadata, AssembledModule, ParameterSchema, TemplatedModule, ValueAssignment,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap())
}

/// Assembles configuration modules from templates and assignments
#[derive(Debug, Default)]
pub struct TemplateAssembler;

impl TemplateAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Fill a template with assignments, producing concrete config lines
    ///
    /// Body lines with an unbound optional placeholder are dropped
    /// silently; an unbound required placeholder drops the line and
    /// records a warning. `missing_required` lists required parameters
    /// absent from the assignment list entirely.
    pub fn assemble(
        &self,
        template: &TemplatedModule,
        assignments: &[ValueAssignment],
        index: Option<u32>,
    ) -> AssembledModule {
        let assignment_map: BTreeMap<&str, &ValueAssignment> = assignments
            .iter()
            .map(|a| (a.parameter_name.as_str(), a))
            .collect();

        let missing_required: Vec<String> = template
            .parameters
            .values()
            .filter(|schema| schema.required && !assignment_map.contains_key(schema.name.as_str()))
            .map(|schema| schema.name.clone())
            .collect();

        let header = match index {
            Some(index) => template
                .template
                .header
                .replace("{{index}}", &index.to_string()),
            None => template.template.header.clone(),
        };

        let mut config_lines = vec![header];
        let mut warnings = Vec::new();

        for line in &template.template.body {
            if let Some(filled) =
                fill_line(line, &assignment_map, &template.parameters, &mut warnings)
            {
                config_lines.push(filled);
            }
        }

        tracing::debug!(
            "assembled {} with {} lines, {} missing required",
            template.module_path,
            config_lines.len(),
            missing_required.len()
        );

        AssembledModule {
            module_path: template.module_path.clone(),
            config_lines,
            parameter_assignments: assignments.to_vec(),
            missing_required,
            warnings,
            metadata: AssembledMetadata {
                template: Some(template.clone()),
                index,
                category: template.category.clone(),
                module_type: template.module_type,
                parent_module: None,
                parent_index: None,
            },
        }
    }

    /// Assemble several instances of an indexed module
    pub fn assemble_multiple(
        &self,
        template: &TemplatedModule,
        assignment_lists: &[Vec<ValueAssignment>],
        start_index: u32,
    ) -> Vec<AssembledModule> {
        assignment_lists
            .iter()
            .enumerate()
            .map(|(offset, assignments)| {
                self.assemble(template, assignments, Some(start_index + offset as u32))
            })
            .collect()
    }
}

/// Fill one body line; `None` drops the line
fn fill_line(
    line: &str,
    assignment_map: &BTreeMap<&str, &ValueAssignment>,
    parameters: &BTreeMap<String, ParameterSchema>,
    warnings: &mut Vec<String>,
) -> Option<String> {
    let placeholders: Vec<String> = placeholder_re()
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect();

    if placeholders.is_empty() {
        return Some(line.to_string());
    }

    let mut filled = line.to_string();
    let mut line_warnings = Vec::new();
    let mut all_filled = true;

    for placeholder in &placeholders {
        match assignment_map.get(placeholder.as_str()) {
            Some(assignment) => {
                let value = format_value(&assignment.value, &assignment.parameter_type);
                filled = filled.replace(&format!("{{{{{placeholder}}}}}"), &value);
            }
            None => {
                let required = parameters
                    .get(placeholder)
                    .map(|schema| schema.required)
                    .unwrap_or(false);
                if required {
                    line_warnings.push(format!("Missing required parameter: {placeholder}"));
                    all_filled = false;
                } else {
                    // Optional placeholder unbound: drop the whole line
                    return None;
                }
            }
        }
    }

    warnings.extend(line_warnings);
    all_filled.then_some(filled)
}

/// Format a value for emission, quoting string values that need it
fn format_value(value: &str, param_type: &str) -> String {
    if matches!(param_type, "string" | "quoted_string") && !value.starts_with('"') {
        let needs_quotes =
            value.contains(' ') || value.contains('-') || value.contains('/') || value.contains('\\');
        if needs_quotes {
            return format!("\"{value}\"");
        }
    }
    value.to_string()
}
