//! Indexing templates into a vector store

use crate::error::Result;
use confgen_core::TemplatedModule;
use confgen_retrieval::{EmbeddingClient, InMemoryVectorStore};
use confgen_templates::TemplateStore;

/// Text a template is embedded from: path, category, description, tags,
/// and parameter names
pub fn template_document(template: &TemplatedModule) -> String {
    let mut parts = vec![
        template.module_path.clone(),
        template.category.clone(),
        template.description.clone(),
    ];
    parts.extend(template.tags.iter().cloned());
    parts.extend(template.parameters.keys().cloned());
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Embed every template of a store into an in-memory vector store
pub async fn index_templates(
    templates: &TemplateStore,
    embedder: &dyn EmbeddingClient,
    store: &mut InMemoryVectorStore,
) -> Result<usize> {
    for template in &templates.templates {
        let document = template_document(template);
        let embedding = embedder.embed(&document).await?;
        store.insert(embedding, template.clone(), document);
    }

    tracing::info!("indexed {} templates", templates.len());
    Ok(templates.len())
}
