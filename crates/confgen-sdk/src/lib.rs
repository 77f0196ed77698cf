//! confgen SDK - High-level API for configuration generation
//!
//! This crate wires the confgen pipeline together:
//! - **Generation**: natural-language requirement -> retrieved templates ->
//!   extracted values -> matched parameters -> resolved relationships ->
//!   assembled, ordered, validated configuration
//! - **Ingestion**: historical configuration files -> parsed module corpus ->
//!   value patterns and learned defaults -> annotated templates, with an
//!   incremental state file so unchanged sources are skipped
//! - **Rendering**: CLI text / JSON / YAML output of generated configurations
//!
//! # Quick Start
//!
//! ```no_run
//! use confgen_retrieval::{InMemoryVectorStore, MockEmbeddingClient};
//! use confgen_sdk::{Generator, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = InMemoryVectorStore::new();
//!     // ... index templates into the store ...
//!
//!     let generator = Generator::new(
//!         GeneratorConfig::default(),
//!         Box::new(MockEmbeddingClient::default()),
//!         Box::new(store),
//!     );
//!
//!     let outcome = generator.generate("Create VIP 10.1.1.100 on port 443").await?;
//!     println!("{}", outcome.config.to_text());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod generator;
pub mod index;
pub mod ingest;
pub mod render;

pub use config::GeneratorConfig;
pub use context::GenerationContext;
pub use error::{Result, SdkError};
pub use generator::{GenerationOutcome, GenerationStats, Generator};
pub use index::index_templates;
pub use ingest::{IngestReport, IngestState, Ingestor};
