//! Semantic annotation of mined module groups
//!
//! The LLM-backed annotator labels a module path with a category,
//! description, tags, placeholder names, and dependencies. When the
//! service call fails, annotation falls back to a deterministic
//! path-based heuristic rather than aborting ingestion.

use crate::error::{RetrievalError, Result};
use async_trait::async_trait;
use confgen_core::TemplateDependencies;
use confgen_templates::Annotation;
use serde::{Deserialize, Serialize};

/// Path-substring category table, probed in order
const PATH_CATEGORIES: [(&str, &str); 8] = [
    ("/slb/ssl", "security_ssl"),
    ("/slb", "load_balancing"),
    ("/l3", "network_layer3"),
    ("/l2", "network_layer2"),
    ("/port", "network_layer2"),
    ("/sys/ntp", "monitoring"),
    ("/sys/access", "security_access"),
    ("/sys", "system_management"),
];

/// Static requires-edges used by the heuristic annotator
const PATH_DEPENDENCIES: [(&str, &[&str]); 3] = [
    ("/c/slb/virt", &["/c/slb/group"]),
    ("/c/slb/group", &["/c/slb/real"]),
    ("/c/slb/virt/service", &["/c/slb/virt", "/c/slb/group"]),
];

/// Async semantic annotator
#[async_trait]
pub trait TemplateAnnotator: Send + Sync {
    /// Annotate one module path given sample configuration lines
    async fn annotate(&self, module_path: &str, sample_lines: &[String]) -> Result<Annotation>;
}

/// Deterministic annotation from path substrings
///
/// Also used as the fallback when the LLM-backed annotator fails.
#[derive(Debug, Default)]
pub struct HeuristicAnnotator;

impl HeuristicAnnotator {
    pub fn new() -> Self {
        Self
    }

    fn annotate_sync(&self, module_path: &str) -> Annotation {
        let path = module_path.to_lowercase();
        let category = PATH_CATEGORIES
            .iter()
            .find(|(fragment, _)| path.contains(fragment))
            .map(|(_, category)| category.to_string())
            .unwrap_or_else(|| "general".to_string());

        let dependencies = PATH_DEPENDENCIES
            .iter()
            .find(|(p, _)| *p == module_path)
            .map(|(_, requires)| TemplateDependencies {
                requires: requires.iter().map(|r| r.to_string()).collect(),
                required_by: Vec::new(),
            })
            .unwrap_or_default();

        let tags: Vec<String> = module_path
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "c")
            .map(|segment| segment.to_string())
            .collect();

        Annotation {
            category,
            description: format!("Configuration module {module_path}"),
            tags,
            parameter_hints: Default::default(),
            dependencies,
        }
    }
}

#[async_trait]
impl TemplateAnnotator for HeuristicAnnotator {
    async fn annotate(&self, module_path: &str, _sample_lines: &[String]) -> Result<Annotation> {
        Ok(self.annotate_sync(module_path))
    }
}

#[derive(Debug, Serialize)]
struct AnnotationRequest<'a> {
    module_path: &'a str,
    sample_lines: &'a [String],
}

#[derive(Debug, Deserialize)]
struct AnnotationResponse {
    annotation: Annotation,
}

/// Annotator backed by an LLM labeling service
///
/// Falls back to [`HeuristicAnnotator`] on any service failure; this is
/// the only boundary where a failure is substituted rather than
/// propagated, so a labeling outage degrades template quality instead of
/// blocking ingestion.
pub struct LlmAnnotator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    fallback: HeuristicAnnotator,
}

impl LlmAnnotator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
            fallback: HeuristicAnnotator::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn call_service(
        &self,
        module_path: &str,
        sample_lines: &[String],
    ) -> Result<Annotation> {
        let mut request = self.client.post(&self.endpoint).json(&AnnotationRequest {
            module_path,
            sample_lines,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RetrievalError::ApiCallFailed(format!(
                "annotation service returned {}",
                response.status()
            )));
        }

        let body: AnnotationResponse = response.json().await?;
        Ok(body.annotation)
    }
}

#[async_trait]
impl TemplateAnnotator for LlmAnnotator {
    async fn annotate(&self, module_path: &str, sample_lines: &[String]) -> Result<Annotation> {
        match self.call_service(module_path, sample_lines).await {
            Ok(annotation) => Ok(annotation),
            Err(error) => {
                tracing::warn!(
                    "annotation service failed for {module_path}: {error}; using heuristic fallback"
                );
                Ok(self.fallback.annotate_sync(module_path))
            }
        }
    }
}
