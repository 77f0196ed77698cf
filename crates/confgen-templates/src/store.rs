//! JSON persistence for the parsed corpus and the template store

use crate::error::Result;
use confgen_core::{ModuleBlock, TemplatedModule};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata stamped onto a persisted corpus document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CorpusMetadata {
    pub generated_at: String,
    pub source_file: String,
    pub module_count: usize,
    pub phase: String,
}

/// A parse run persisted as JSON: metadata plus all module blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorpusDocument {
    pub metadata: CorpusMetadata,
    pub modules: Vec<ModuleBlock>,
}

impl CorpusDocument {
    pub fn new(metadata: CorpusMetadata, modules: Vec<ModuleBlock>) -> Self {
        Self { metadata, modules }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Collection of generated templates persisted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateStore {
    pub templates: Vec<TemplatedModule>,
}

impl TemplateStore {
    pub fn new(templates: Vec<TemplatedModule>) -> Self {
        Self { templates }
    }

    /// Add or replace the template for a module path
    pub fn upsert(&mut self, template: TemplatedModule) {
        match self
            .templates
            .iter_mut()
            .find(|t| t.module_path == template.module_path)
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn by_path(&self, module_path: &str) -> Option<&TemplatedModule> {
        self.templates
            .iter()
            .find(|t| t.module_path == module_path)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_core::TemplateBody;

    #[test]
    fn test_corpus_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        let mut block = ModuleBlock::new(1);
        block.module_path = "/c/slb/real".to_string();
        block.index = Some("1".to_string());
        block.sub_lines = vec!["rip 10.0.0.1".to_string()];
        block.raw_lines = vec!["/c/slb/real 1".to_string(), "\trip 10.0.0.1".to_string()];

        let document = CorpusDocument::new(
            CorpusMetadata {
                generated_at: "2025-11-02T10:00:00Z".to_string(),
                source_file: "switch-a.cfg".to_string(),
                module_count: 1,
                phase: "ingest".to_string(),
            },
            vec![block],
        );

        document.save(&path).unwrap();
        let loaded = CorpusDocument::load(&path).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn test_template_store_upsert_and_lookup() {
        let mut store = TemplateStore::default();
        store.upsert(TemplatedModule::new(
            "/c/slb/real",
            TemplateBody {
                header: "/c/slb/real {{index}}".to_string(),
                body: vec![],
            },
        ));
        store.upsert(TemplatedModule::new(
            "/c/slb/real",
            TemplateBody {
                header: "/c/slb/real {{index}}".to_string(),
                body: vec!["rip {{real_ip}}".to_string()],
            },
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.by_path("/c/slb/real").unwrap().template.body,
            vec!["rip {{real_ip}}"]
        );
        assert!(store.by_path("/c/slb/virt").is_none());
    }
}
