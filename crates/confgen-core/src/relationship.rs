//! Cross-module relationship declarations

/// A declared relationship between two module paths
///
/// The source module carries a parameter whose value must reference an
/// instance index of the target module, e.g. a server group's member list
/// referencing real-server indices. The known relationships form a small
/// fixed table; see the engine's relationship resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRelationship {
    pub source_module: &'static str,
    pub source_param: &'static str,
    pub target_module: &'static str,
    pub target_param: &'static str,
    pub relationship_type: &'static str,
}
