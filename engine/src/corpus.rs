//! Corpus assembly: catalog in, QA pairs plus a run report out.

use crate::document::{Catalog, RawDataset};
use crate::error::QaError;
use crate::families::FamilyRegistry;
use crate::generic;
use crate::persist::{dataset_prefix, latest_with_prefix, load_dataset, rfc3339_now};
use crate::qa::{QaCorpus, QaPair, QaSink};
use crate::series::DatasetView;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;

/// Where raw dataset documents come from.
pub trait DatasetSource {
    fn load(&self, dataset_id: &str) -> Result<RawDataset, QaError>;
}

/// Downloads directory holding `dataset_<id>_<stamp>.json` files; the
/// lexically last match per id wins.
pub struct DirectorySource {
    pub dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatasetSource for DirectorySource {
    fn load(&self, dataset_id: &str) -> Result<RawDataset, QaError> {
        let found = latest_with_prefix(&self.dir, &dataset_prefix(dataset_id))
            .map_err(|e| QaError::dataset_load(dataset_id, e))?;
        match found {
            Some(path) => load_dataset(dataset_id, &path),
            None => Err(QaError::dataset_load(
                dataset_id,
                format!("no downloaded file in {}", self.dir.display()),
            )),
        }
    }
}

/// Documents held in memory, keyed by dataset id.
#[derive(Default)]
pub struct MemorySource {
    docs: HashMap<String, RawDataset>,
}

impl MemorySource {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, dataset_id: &str, doc: RawDataset) {
        self.docs.insert(dataset_id.to_string(), doc);
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, dataset_id: &str) -> Result<RawDataset, QaError> {
        self.docs
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| QaError::dataset_load(dataset_id, "not present in source"))
    }
}

/// Generic statements followed by the registered family's statements.
pub fn generate_for_dataset(
    doc: &RawDataset,
    dataset_id: &str,
    title: &str,
    registry: &FamilyRegistry,
) -> Result<Vec<QaPair>, QaError> {
    let view = DatasetView::new(doc).ok_or_else(|| QaError::generation(dataset_id, "dataset has no data rows"))?;

    let mut out = QaSink::new(dataset_id);
    generic::generate(&view, title, &mut out);
    let mut pairs = out.into_pairs();
    if let Some(spec) = registry.get(dataset_id) {
        pairs.extend(spec.generate(&view, dataset_id, title));
    }
    Ok(pairs)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_pairs: usize,
}

#[derive(Debug)]
pub struct Assembly {
    pub pairs: Vec<QaPair>,
    pub report: RunReport,
    /// Pair count of every generated dataset, in catalog order.
    pub generated: Vec<(String, usize)>,
    pub failures: Vec<(String, QaError)>,
}

impl Assembly {
    pub fn into_corpus(self, source_url: &str) -> QaCorpus {
        QaCorpus { created_at: rfc3339_now(), source_url: source_url.to_string(), qa_pairs: self.pairs }
    }
}

pub struct Assembler {
    registry: FamilyRegistry,
}

impl Assembler {
    pub fn new(registry: FamilyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FamilyRegistry { &self.registry }

    /// One pass over the catalog in listing order. A failing dataset is
    /// recorded and skipped; the run itself never fails.
    pub fn run(&self, catalog: &Catalog, source: &dyn DatasetSource) -> Assembly {
        let mut pairs = Vec::new();
        let mut generated_counts = Vec::new();
        let mut failures = Vec::new();
        let mut report = RunReport::default();

        for entry in &catalog.content.datasets {
            report.processed += 1;
            match self.process(&entry.id, &entry.title, source) {
                Ok(generated) => {
                    tracing::info!(dataset_id = %entry.id, pairs = generated.len(), "generated");
                    report.succeeded += 1;
                    generated_counts.push((entry.id.clone(), generated.len()));
                    pairs.extend(generated);
                }
                Err(err) => {
                    tracing::warn!(dataset_id = %entry.id, error = %err, "dataset skipped");
                    report.failed += 1;
                    failures.push((entry.id.clone(), err));
                }
            }
        }

        report.total_pairs = pairs.len();
        Assembly { pairs, report, generated: generated_counts, failures }
    }

    fn process(&self, dataset_id: &str, title: &str, source: &dyn DatasetSource) -> Result<Vec<QaPair>, QaError> {
        let doc = source.load(dataset_id)?;
        catch_unwind(AssertUnwindSafe(|| generate_for_dataset(&doc, dataset_id, title, &self.registry)))
            .unwrap_or_else(|panic| Err(QaError::generation(dataset_id, panic_message(panic.as_ref()))))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "generator panicked".to_string()
    }
}
