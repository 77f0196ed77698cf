//! confgen Templates - corpus-side mining of configuration templates
//!
//! Given many parsed instances of the same module path, this crate detects
//! per-key value patterns and types, derives statistical defaults, and
//! generalizes the instances into a [`TemplatedModule`](confgen_core::TemplatedModule)
//! with `{{placeholder}}` tokens. It also persists the parsed corpus and
//! the generated template store as JSON.

pub mod annotation;
pub mod defaults;
pub mod error;
pub mod generator;
pub mod patterns;
pub mod store;

pub use annotation::{Annotation, PlaceholderHint};
pub use defaults::DefaultCalculator;
pub use error::{Result, TemplateError};
pub use generator::TemplateGenerator;
pub use patterns::{PatternExtractor, PatternSet, ValuePattern};
pub use store::{CorpusDocument, CorpusMetadata, TemplateStore};
