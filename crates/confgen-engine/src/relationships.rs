//! Inter-module relationship resolution
//!
//! Relationships are a small fixed table: a source module's parameter
//! must reference an instance index of a target module. Resolution runs
//! on assignment lists BEFORE assembly, once every pending module has
//! been materialized, so the index map covers the whole generation.

use confgen_core::{
    AssignmentSource, ModuleRelationship, TemplatedModule, ValueAssignment,
};
use std::collections::{BTreeMap, BTreeSet};

/// Confidence stamped onto relationship-resolved assignments
pub const RELATIONSHIP_CONFIDENCE: f64 = 0.95;

/// Known cross-module relationships
pub const RELATIONSHIPS: [ModuleRelationship; 2] = [
    // Group member list references real-server indices
    ModuleRelationship {
        source_module: "/c/slb/group",
        source_param: "group_member",
        target_module: "/c/slb/real",
        target_param: "index",
        relationship_type: "references",
    },
    // Virtual server references its service group
    ModuleRelationship {
        source_module: "/c/slb/virt",
        source_param: "service_group_id",
        target_module: "/c/slb/group",
        target_param: "index",
        relationship_type: "references",
    },
];

/// A module awaiting assembly: template, assignments, allocated index
#[derive(Debug, Clone)]
pub struct PendingModule {
    pub template: TemplatedModule,
    pub assignments: Vec<ValueAssignment>,
    pub index: Option<u32>,
}

impl PendingModule {
    pub fn new(template: TemplatedModule, assignments: Vec<ValueAssignment>, index: Option<u32>) -> Self {
        Self {
            template,
            assignments,
            index,
        }
    }
}

/// Rewrites referencing assignments to point at concrete sibling indices
#[derive(Debug, Default)]
pub struct RelationshipResolver;

impl RelationshipResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve references across all pending modules, in place
    pub fn resolve(&self, pending: &mut [PendingModule]) {
        let index_map = build_index_map(pending);

        for module in pending.iter_mut() {
            for relationship in &RELATIONSHIPS {
                if module.template.module_path != relationship.source_module {
                    continue;
                }
                let Some(target_indices) = index_map.get(relationship.target_module) else {
                    continue;
                };
                // TODO: fan out one reference per target instead of first-index-wins
                // once templates can express repeated member lines
                let Some(first_target) = target_indices.first() else {
                    continue;
                };

                if let Some(assignment) = module
                    .assignments
                    .iter_mut()
                    .find(|a| a.parameter_name == relationship.source_param)
                {
                    let old_value = assignment.value.clone();
                    assignment.value = first_target.to_string();
                    assignment.source = AssignmentSource::Relationship;
                    assignment.confidence = RELATIONSHIP_CONFIDENCE;
                    tracing::debug!(
                        "{}.{}: {} -> {} (references {})",
                        relationship.source_module,
                        relationship.source_param,
                        old_value,
                        assignment.value,
                        relationship.target_module
                    );
                }
            }
        }
    }

    /// Relationship targets absent from the pending set
    pub fn suggest_missing(&self, present_paths: &BTreeSet<String>) -> Vec<String> {
        let mut missing = BTreeSet::new();
        for relationship in &RELATIONSHIPS {
            if present_paths.contains(relationship.source_module)
                && !present_paths.contains(relationship.target_module)
            {
                missing.insert(relationship.target_module.to_string());
            }
        }
        missing.into_iter().collect()
    }
}

/// Allocated indices per module path, in pending order
fn build_index_map(pending: &[PendingModule]) -> BTreeMap<String, Vec<u32>> {
    let mut map: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for module in pending {
        if let Some(index) = module.index {
            map.entry(module.template.module_path.clone())
                .or_default()
                .push(index);
        }
    }
    map
}
