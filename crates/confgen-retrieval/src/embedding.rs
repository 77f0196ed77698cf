//! Embedding client interface and implementations

use crate::error::{RetrievalError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Async embedding client
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a single text into a vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedding client backed by an HTTP embedding service
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEmbeddingClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl EmbeddingClient for HttpEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tracing::debug!("requesting embedding from {}", self.endpoint);

        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            input: text,
            model: &self.model,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(RetrievalError::ApiCallFailed(format!(
                "embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(RetrievalError::InvalidResponse(
                "empty embedding vector".to_string(),
            ));
        }
        Ok(body.embedding)
    }
}

/// Deterministic mock embedder for tests and offline runs
///
/// Hashes whitespace tokens into a fixed number of dimensions and
/// normalizes the result, so related texts share dimensions without any
/// network dependency.
pub struct MockEmbeddingClient {
    dimensions: usize,
}

impl Default for MockEmbeddingClient {
    fn default() -> Self {
        Self { dimensions: 64 }
    }
}

impl MockEmbeddingClient {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimensions;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl EmbeddingClient for MockEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedding_is_deterministic() {
        let client = MockEmbeddingClient::default();
        let a = client.embed("create vip on port 443").await.unwrap();
        let b = client.embed("create vip on port 443").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[tokio::test]
    async fn test_mock_embedding_is_normalized() {
        let client = MockEmbeddingClient::new(32);
        let v = client.embed("virtual server configuration").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_tokens_increase_similarity() {
        let client = MockEmbeddingClient::default();
        let a = client.embed("virtual server vip").await.unwrap();
        let b = client.embed("virtual server pool").await.unwrap();
        let c = client.embed("ntp clock sync").await.unwrap();

        let dot = |x: &[f32], y: &[f32]| -> f32 { x.iter().zip(y).map(|(a, b)| a * b).sum() };
        assert!(dot(&a, &b) > dot(&a, &c));
    }
}
