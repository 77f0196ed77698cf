//! End-to-end configuration generation

use crate::config::{GeneratorConfig, DEPENDENCY_SIMILARITY, MAX_DEPENDENCY_ITERATIONS};
use crate::context::GenerationContext;
use crate::error::{Result, SdkError};
use confgen_core::{
    AssembledMetadata, AssembledModule, AssignmentSource, ModuleType, ValueAssignment,
};
use confgen_engine::{
    ConfigComposer, ConfigValidator, DependencyResolver, GeneratedConfig, ParameterMatcher,
    PendingModule, RelationshipResolver, RequirementExtractor, TemplateAssembler,
    ValidationReport,
};
use confgen_retrieval::{
    EmbeddingClient, QueryBuilder, RetrievedTemplate, VectorQuery, VectorStoreClient,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Run statistics for one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationStats {
    pub templates_retrieved: usize,
    pub values_extracted: usize,
    pub modules_generated: usize,
    pub is_valid: bool,
}

/// Everything produced by one generation call
#[derive(Debug)]
pub struct GenerationOutcome {
    pub config: GeneratedConfig,
    pub report: ValidationReport,
    pub warnings: Vec<String>,
    pub stats: GenerationStats,
}

/// End-to-end generator: requirement text in, validated configuration out
pub struct Generator {
    config: GeneratorConfig,
    embedder: Box<dyn EmbeddingClient>,
    store: Box<dyn VectorStoreClient>,
    query_builder: QueryBuilder,
}

impl Generator {
    pub fn new(
        config: GeneratorConfig,
        embedder: Box<dyn EmbeddingClient>,
        store: Box<dyn VectorStoreClient>,
    ) -> Self {
        Self {
            config,
            embedder,
            store,
            query_builder: QueryBuilder::new(),
        }
    }

    /// Generate a configuration for a natural-language requirement
    ///
    /// The stages run strictly in sequence. All per-template assignment
    /// lists are materialized before relationship resolution starts, and
    /// relationship resolution completes before any assembly; those two
    /// barriers carry the consistency guarantees of the pipeline.
    pub async fn generate(&self, requirement: &str) -> Result<GenerationOutcome> {
        tracing::info!("generating configuration for requirement: {requirement}");

        // Retrieval
        let mut retrieved = self.retrieve_templates(requirement).await?;
        if retrieved.is_empty() {
            return Err(SdkError::NoTemplatesFound);
        }
        self.pull_missing_dependencies(&mut retrieved).await?;
        let templates_retrieved = retrieved.len();

        // Value extraction
        let extracted = RequirementExtractor::new().extract(requirement);
        let values_extracted = extracted.values().map(Vec::len).sum();

        // Matching and index allocation, one assignment list per template
        let matcher = ParameterMatcher::new();
        let mut context = GenerationContext::new();
        let mut pending: Vec<PendingModule> = Vec::new();

        for retrieved_template in &retrieved {
            let template = &retrieved_template.template;
            let assignments = matcher.match_parameters(
                &template.parameters,
                &extracted,
                &template.learned_defaults,
                self.config.auto_fill_defaults,
            );
            let index = context.allocate(&template.module_path);
            pending.push(PendingModule::new(template.clone(), assignments, index));
        }

        // Barrier: every assignment list exists; now resolve references,
        // then assemble
        RelationshipResolver::new().resolve(&mut pending);

        let assembler = TemplateAssembler::new();
        let mut assembled: Vec<AssembledModule> = pending
            .iter()
            .map(|p| assembler.assemble(&p.template, &p.assignments, p.index))
            .collect();

        // SSL virtual services are synthesized, not retrieved
        if requirement.to_lowercase().contains("ssl") {
            let services = synthesize_ssl_services(&assembled);
            assembled.extend(services);
        }

        // Ordering
        let resolver = DependencyResolver::new();
        let (ordered, mut warnings) = resolver.order_modules(assembled);
        let missing = resolver.find_missing_dependencies(&ordered);
        if !missing.is_empty() {
            warnings.push(format!("Missing dependencies: {}", missing.join(", ")));
        }

        // Composition and validation
        let mut composer = ConfigComposer::new();
        if !self.config.include_header {
            composer = composer.without_header();
        }
        if !self.config.include_footer {
            composer = composer.without_footer();
        }
        let mut config = composer.compose(ordered, requirement);
        config.warnings.extend(warnings);

        let report = if self.config.validate {
            ConfigValidator::new().validate_all(&config)
        } else {
            ValidationReport {
                is_valid: true,
                errors: Vec::new(),
                warnings: Vec::new(),
                info: Vec::new(),
                summary: "Validation disabled".to_string(),
            }
        };

        let mut all_warnings = config.warnings.clone();
        all_warnings.extend(report.errors.iter().map(|e| e.message.clone()));
        all_warnings.extend(report.warnings.iter().map(|w| w.message.clone()));

        let stats = GenerationStats {
            templates_retrieved,
            values_extracted,
            modules_generated: config.modules.len(),
            is_valid: report.is_valid,
        };

        tracing::info!(
            "generated {} modules ({} warnings, valid: {})",
            stats.modules_generated,
            all_warnings.len(),
            stats.is_valid
        );

        Ok(GenerationOutcome {
            config,
            report,
            warnings: all_warnings,
            stats,
        })
    }

    async fn retrieve_templates(&self, requirement: &str) -> Result<Vec<RetrievedTemplate>> {
        let query_text = self.query_builder.query_text(requirement);
        let embedding = self.embedder.embed(&query_text).await?;
        let query = VectorQuery::new(embedding, self.config.top_k);
        Ok(self.store.search(&query).await?)
    }

    /// Pull in relationship targets that retrieval missed
    ///
    /// Iterates because an added module can itself reference another
    /// missing one (virt pulls group, group pulls real).
    async fn pull_missing_dependencies(
        &self,
        retrieved: &mut Vec<RetrievedTemplate>,
    ) -> Result<()> {
        let resolver = RelationshipResolver::new();

        for _ in 0..MAX_DEPENDENCY_ITERATIONS {
            let present: BTreeSet<String> = retrieved
                .iter()
                .map(|r| r.template.module_path.clone())
                .collect();

            let missing = resolver.suggest_missing(&present);
            if missing.is_empty() {
                return Ok(());
            }

            let mut added = false;
            for module_path in missing {
                if let Some(mut template) = self.store.search_by_path(&module_path).await? {
                    tracing::debug!("pulled missing dependency template: {module_path}");
                    template.similarity = DEPENDENCY_SIMILARITY;
                    retrieved.push(template);
                    added = true;
                }
            }
            if !added {
                return Ok(());
            }
        }
        Ok(())
    }
}

/// Synthesize `/c/slb/virt/service` sub-modules for SSL virtual servers
///
/// Each virt module carrying a port-bearing assignment gets a service
/// sub-block whose group reference equals the parent's service group
/// (default "1" when the parent has none).
fn synthesize_ssl_services(assembled: &[AssembledModule]) -> Vec<AssembledModule> {
    let mut services = Vec::new();

    for module in assembled {
        if module.module_path != "/c/slb/virt" {
            continue;
        }

        let port = module
            .parameter_assignments
            .iter()
            .find(|a| a.parameter_type == "port" || a.parameter_name.contains("port"))
            .map(|a| a.value.clone());
        let Some(port) = port else {
            continue;
        };

        let group = module
            .assignment("service_group_id")
            .map(|a| a.value.clone())
            .unwrap_or_else(|| "1".to_string());
        let virt_index = module.metadata.index.unwrap_or(1);

        let config_lines = vec![
            format!("/c/slb/virt {virt_index}/service {port} ssl"),
            format!("\tgroup {group}"),
            format!("\trport {port}"),
        ];

        let parameter_assignments = vec![
            ValueAssignment::new("port", "integer", port.clone(), AssignmentSource::User, 0.95, "port"),
            ValueAssignment::new(
                "protocol",
                "string",
                "ssl",
                AssignmentSource::User,
                0.95,
                "protocol",
            ),
            ValueAssignment::new(
                "group",
                "integer",
                group,
                AssignmentSource::Relationship,
                0.95,
                "group",
            ),
        ];

        tracing::debug!("synthesized SSL service sub-module for virt {virt_index}");

        services.push(AssembledModule {
            module_path: "/c/slb/virt/service".to_string(),
            config_lines,
            parameter_assignments,
            missing_required: Vec::new(),
            warnings: Vec::new(),
            metadata: AssembledMetadata {
                template: None,
                index: None,
                category: "service".to_string(),
                module_type: ModuleType::Standard,
                parent_module: Some("/c/slb/virt".to_string()),
                parent_index: Some(virt_index),
            },
        });
    }

    services
}
