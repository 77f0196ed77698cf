//! confgen Retrieval - external service boundary
//!
//! This crate wraps the services the generation pipeline consumes as
//! opaque RPCs:
//! - Embedding generation for requirement and template text
//! - Vector-similarity template retrieval
//! - Semantic annotation of mined module groups (with a deterministic
//!   heuristic fallback)
//!
//! Calls are synchronous point requests with no retry logic; a failure
//! propagates upward and aborts the generation it belongs to. In-memory
//! implementations are provided for tests and local runs.

pub mod annotator;
pub mod embedding;
pub mod error;
pub mod query;
pub mod vector_store;

pub use annotator::{HeuristicAnnotator, LlmAnnotator, TemplateAnnotator};
pub use embedding::{EmbeddingClient, HttpEmbeddingClient, MockEmbeddingClient};
pub use error::{RetrievalError, Result};
pub use query::QueryBuilder;
pub use vector_store::{
    HttpVectorStore, InMemoryVectorStore, RetrievedTemplate, VectorQuery, VectorStoreClient,
};
