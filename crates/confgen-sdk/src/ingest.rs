//! Corpus ingestion with incremental state
//!
//! Parses historical configuration files, groups module instances by
//! path, mines patterns and defaults, annotates, and writes the template
//! store. A state file records per-file modification times and module
//! counts; it is read once at the start of a batch and rewritten once at
//! the end, so concurrent batches against one state file must be
//! serialized by the caller.

use crate::error::Result;
use confgen_core::ModuleBlock;
use confgen_parser::ConfigParser;
use confgen_retrieval::TemplateAnnotator;
use confgen_templates::{
    CorpusDocument, CorpusMetadata, DefaultCalculator, PatternExtractor, TemplateGenerator,
    TemplateStore,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Per-file record in the incremental state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileState {
    pub modified_secs: u64,
    pub module_count: usize,
}

/// Incremental processing state across batch runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IngestState {
    pub files: BTreeMap<String, FileState>,
}

impl IngestState {
    pub fn load(path: impl AsRef<Path>) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn is_unchanged(&self, file_name: &str, modified_secs: u64) -> bool {
        self.files
            .get(file_name)
            .map(|state| state.modified_secs == modified_secs)
            .unwrap_or(false)
    }
}

/// Summary of one ingestion batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IngestReport {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub modules_parsed: usize,
    pub templates_generated: usize,
}

/// Batch ingestion of configuration files into a template store
pub struct Ingestor {
    annotator: Box<dyn TemplateAnnotator>,
    state_path: Option<PathBuf>,
    corpus_dir: Option<PathBuf>,
}

impl Ingestor {
    pub fn new(annotator: Box<dyn TemplateAnnotator>) -> Self {
        Self {
            annotator,
            state_path: None,
            corpus_dir: None,
        }
    }

    /// Track incremental state in the given file
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Persist parsed corpus documents into the given directory
    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = Some(dir.into());
        self
    }

    /// Ingest every file in a directory, updating the template store
    pub async fn ingest_dir(
        &self,
        source_dir: impl AsRef<Path>,
        store: &mut TemplateStore,
    ) -> Result<IngestReport> {
        let mut state = match &self.state_path {
            Some(path) => IngestState::load(path),
            None => IngestState::default(),
        };
        let mut report = IngestReport::default();
        let mut all_modules: Vec<ModuleBlock> = Vec::new();

        let mut entries: Vec<PathBuf> = std::fs::read_dir(source_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        for path in entries {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let modified_secs = modified_seconds(&path)?;

            if state.is_unchanged(&file_name, modified_secs) {
                tracing::debug!("skipping unchanged file: {file_name}");
                report.files_skipped += 1;
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            let modules = ConfigParser::new().parse(&content);
            tracing::info!("parsed {file_name}: {} modules", modules.len());

            if let Some(corpus_dir) = &self.corpus_dir {
                std::fs::create_dir_all(corpus_dir)?;
                let document = CorpusDocument::new(
                    CorpusMetadata {
                        generated_at: chrono::Utc::now().to_rfc3339(),
                        source_file: file_name.clone(),
                        module_count: modules.len(),
                        phase: "ingest".to_string(),
                    },
                    modules.clone(),
                );
                document.save(corpus_dir.join(format!("{file_name}.json")))?;
            }

            state.files.insert(
                file_name,
                FileState {
                    modified_secs,
                    module_count: modules.len(),
                },
            );
            report.files_processed += 1;
            report.modules_parsed += modules.len();
            all_modules.extend(modules);
        }

        report.templates_generated = self.mine_templates(&all_modules, store).await?;

        if let Some(path) = &self.state_path {
            state.save(path)?;
        }

        Ok(report)
    }

    /// Group modules by path and generate one template per group
    async fn mine_templates(
        &self,
        modules: &[ModuleBlock],
        store: &mut TemplateStore,
    ) -> Result<usize> {
        let mut groups: BTreeMap<&str, Vec<ModuleBlock>> = BTreeMap::new();
        for module in modules {
            groups
                .entry(module.module_path.as_str())
                .or_default()
                .push(module.clone());
        }

        let extractor = PatternExtractor::new();
        let calculator = DefaultCalculator::default();
        let generator = TemplateGenerator::new();
        let mut generated = 0;

        for (module_path, group) in groups {
            // Comment pseudo-headers and empty declarations carry nothing to mine
            if group.iter().all(|m| m.sub_lines.is_empty()) {
                continue;
            }

            let patterns = extractor.extract(&group);
            let defaults = calculator.calculate(&patterns);

            let sample_lines = group
                .first()
                .map(|m| m.sub_lines.clone())
                .unwrap_or_default();
            let annotation = self.annotator.annotate(module_path, &sample_lines).await?;

            let mut template = generator.generate(module_path, &group, &patterns, &annotation)?;
            calculator.apply_defaults(&mut template, &defaults);
            template.created_at = chrono::Utc::now().to_rfc3339();

            store.upsert(template);
            generated += 1;
        }

        Ok(generated)
    }
}

fn modified_seconds(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use confgen_retrieval::HeuristicAnnotator;

    const SAMPLE: &str = "/c/slb/real 1\n\trip 10.0.0.1\n\tena\n/c/slb/real 2\n\trip 10.0.0.2\n\tena\n";

    #[tokio::test]
    async fn test_ingest_generates_templates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("switch-a.cfg"), SAMPLE).unwrap();

        let ingestor = Ingestor::new(Box::new(HeuristicAnnotator::new()));
        let mut store = TemplateStore::default();
        let report = ingestor.ingest_dir(dir.path(), &mut store).await.unwrap();

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.templates_generated, 1);

        let template = store.by_path("/c/slb/real").unwrap();
        assert_eq!(template.examples_seen, 2);
        assert_eq!(template.category, "load_balancing");
        assert!(template.index_required);
        // The enable flag appears in every instance and earns a default
        assert_eq!(
            template.learned_defaults["ena"].default.as_deref(),
            Some("ena")
        );
    }

    #[tokio::test]
    async fn test_state_file_skips_unchanged_files() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        std::fs::write(dir.path().join("switch-a.cfg"), SAMPLE).unwrap();

        let ingestor =
            Ingestor::new(Box::new(HeuristicAnnotator::new())).with_state_file(&state_path);

        let mut store = TemplateStore::default();
        let first = ingestor.ingest_dir(dir.path(), &mut store).await.unwrap();
        assert_eq!(first.files_processed, 1);
        assert_eq!(first.files_skipped, 0);

        let second = ingestor.ingest_dir(dir.path(), &mut store).await.unwrap();
        assert_eq!(second.files_processed, 0);
        assert_eq!(second.files_skipped, 1);
    }

    #[tokio::test]
    async fn test_corpus_documents_written() {
        let dir = tempfile::tempdir().unwrap();
        let corpus_dir = dir.path().join("corpus");
        let source_dir = dir.path().join("configs");
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::write(source_dir.join("switch-a.cfg"), SAMPLE).unwrap();

        let ingestor =
            Ingestor::new(Box::new(HeuristicAnnotator::new())).with_corpus_dir(&corpus_dir);

        let mut store = TemplateStore::default();
        ingestor.ingest_dir(&source_dir, &mut store).await.unwrap();

        let document = CorpusDocument::load(corpus_dir.join("switch-a.cfg.json")).unwrap();
        assert_eq!(document.metadata.module_count, 2);
        assert_eq!(document.modules.len(), 2);
    }
}
