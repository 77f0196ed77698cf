//! Vector-similarity template retrieval

use crate::error::{RetrievalError, Result};
use async_trait::async_trait;
use confgen_core::TemplatedModule;
use serde::{Deserialize, Serialize};

/// Query against the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorQuery {
    pub embedding: Vec<f32>,

    pub top_k: usize,

    /// Restrict results to one semantic category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl VectorQuery {
    pub fn new(embedding: Vec<f32>, top_k: usize) -> Self {
        Self {
            embedding,
            top_k,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A template returned from the vector store with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedTemplate {
    /// Cosine similarity against the query embedding
    pub similarity: f64,

    pub template: TemplatedModule,

    /// The text the template was embedded from
    pub document: String,
}

impl RetrievedTemplate {
    pub fn module_path(&self) -> &str {
        &self.template.module_path
    }
}

/// Async vector store client
#[async_trait]
pub trait VectorStoreClient: Send + Sync {
    /// Ranked similarity search
    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievedTemplate>>;

    /// Exact lookup by module path
    async fn search_by_path(&self, module_path: &str) -> Result<Option<RetrievedTemplate>>;
}

/// Cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

struct StoredRecord {
    embedding: Vec<f32>,
    template: TemplatedModule,
    document: String,
}

/// In-process vector store over owned records
///
/// Used by tests and local runs; production deployments point the
/// pipeline at a remote store through [`HttpVectorStore`].
#[derive(Default)]
pub struct InMemoryVectorStore {
    records: Vec<StoredRecord>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template with its embedding and source document
    pub fn insert(
        &mut self,
        embedding: Vec<f32>,
        template: TemplatedModule,
        document: impl Into<String>,
    ) {
        self.records.push(StoredRecord {
            embedding,
            template,
            document: document.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl VectorStoreClient for InMemoryVectorStore {
    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievedTemplate>> {
        let mut scored: Vec<RetrievedTemplate> = self
            .records
            .iter()
            .filter(|r| match &query.category {
                Some(category) => r.template.category == *category,
                None => true,
            })
            .map(|r| RetrievedTemplate {
                similarity: cosine_similarity(&query.embedding, &r.embedding),
                template: r.template.clone(),
                document: r.document.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(query.top_k);
        Ok(scored)
    }

    async fn search_by_path(&self, module_path: &str) -> Result<Option<RetrievedTemplate>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.template.module_path == module_path)
            .map(|r| RetrievedTemplate {
                similarity: 1.0,
                template: r.template.clone(),
                document: r.document.clone(),
            }))
    }
}

#[derive(Debug, Serialize)]
struct PathQuery<'a> {
    module_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<RetrievedTemplate>,
}

/// Vector store backed by a remote similarity-search service
pub struct HttpVectorStore {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpVectorStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<SearchResponse> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        tracing::debug!("querying vector store: {url}");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RetrievalError::ApiCallFailed(format!(
                "vector store returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl VectorStoreClient for HttpVectorStore {
    async fn search(&self, query: &VectorQuery) -> Result<Vec<RetrievedTemplate>> {
        Ok(self.post_json("search", query).await?.results)
    }

    async fn search_by_path(&self, module_path: &str) -> Result<Option<RetrievedTemplate>> {
        let response = self
            .post_json("search_by_path", &PathQuery { module_path })
            .await?;
        Ok(response.results.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::TemplateBody;

    fn template(path: &str, category: &str) -> TemplatedModule {
        TemplatedModule::new(
            path,
            TemplateBody {
                header: path.to_string(),
                body: vec![],
            },
        )
        .with_category(category)
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[tokio::test]
    async fn test_in_memory_search_ranks_by_similarity() {
        let mut store = InMemoryVectorStore::new();
        store.insert(
            vec![1.0, 0.0, 0.0],
            template("/c/slb/virt", "load_balancing"),
            "virtual server",
        );
        store.insert(
            vec![0.0, 1.0, 0.0],
            template("/c/sys/ntp", "monitoring"),
            "ntp server",
        );

        let query = VectorQuery::new(vec![0.9, 0.1, 0.0], 5);
        let results = store.search(&query).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].module_path(), "/c/slb/virt");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[tokio::test]
    async fn test_category_filter_and_top_k() {
        let mut store = InMemoryVectorStore::new();
        store.insert(
            vec![1.0, 0.0],
            template("/c/slb/virt", "load_balancing"),
            "a",
        );
        store.insert(
            vec![1.0, 0.0],
            template("/c/slb/real", "load_balancing"),
            "b",
        );
        store.insert(vec![1.0, 0.0], template("/c/sys/ntp", "monitoring"), "c");

        let query = VectorQuery::new(vec![1.0, 0.0], 1).with_category("load_balancing");
        let results = store.search(&query).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].template.category, "load_balancing");
    }

    #[tokio::test]
    async fn test_search_by_path() {
        let mut store = InMemoryVectorStore::new();
        store.insert(vec![1.0], template("/c/slb/group", "load_balancing"), "g");

        let found = store.search_by_path("/c/slb/group").await.unwrap();
        assert_eq!(found.unwrap().similarity, 1.0);

        let missing = store.search_by_path("/c/slb/real").await.unwrap();
        assert!(missing.is_none());
    }
}
