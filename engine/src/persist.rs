use crate::document::{parse_dataset, Catalog, RawDataset};
use crate::error::QaError;
use crate::qa::QaCorpus;
use anyhow::Result;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

pub const CATALOG_PREFIX: &str = "statistics_";
pub const CORPUS_FILE: &str = "qa_dataset.json";

/// On-disk layout of a pipeline workspace.
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn data_dir(&self) -> PathBuf { self.root.join("data") }
    pub fn downloads_dir(&self, format: &str) -> PathBuf { self.root.join("downloads").join(format) }
    pub fn corpus_file(&self) -> PathBuf { self.data_dir().join(CORPUS_FILE) }
    pub fn catalog_file(&self, stamp: &str) -> PathBuf {
        self.data_dir().join(format!("{CATALOG_PREFIX}{stamp}.json"))
    }
    pub fn dataset_file(&self, id: &str, stamp: &str, ext: &str) -> PathBuf {
        self.downloads_dir("json").join(format!("{}{stamp}.{ext}", dataset_prefix(id)))
    }
}

pub fn dataset_prefix(id: &str) -> String {
    format!("dataset_{id}_")
}

/// Fixed-width so that lexical order is chronological: `2025-03-11T04-23-45-733Z`.
pub fn file_stamp(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[year]-[month]-[day]T[hour]-[minute]-[second]-[subsecond digits:3]Z"
    ))
    .unwrap_or_default()
}

pub fn rfc3339_now() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// Lexically last `<prefix>*.json` in `dir`; `None` when nothing matches.
pub fn latest_with_prefix(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let mut best: Option<String> = None;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(prefix) && name.ends_with(".json") && best.as_ref().map_or(true, |b| name > *b) {
            best = Some(name);
        }
    }
    Ok(best.map(|name| dir.join(name)))
}

pub fn save_catalog(paths: &DataPaths, catalog: &Catalog, stamp: &str) -> Result<PathBuf> {
    create_dir_all(paths.data_dir())?;
    let path = paths.catalog_file(stamp);
    write_pretty(&path, catalog)?;
    Ok(path)
}

pub fn load_catalog(path: &Path) -> Result<Catalog, QaError> {
    let read_err = |reason: String| QaError::CatalogRead { path: path.to_path_buf(), reason };
    let f = File::open(path).map_err(|e| read_err(e.to_string()))?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| read_err(e.to_string()))
}

/// Newest `statistics_*.json` under the data directory.
pub fn latest_catalog(paths: &DataPaths) -> Result<Catalog, QaError> {
    let dir = paths.data_dir();
    let found = latest_with_prefix(&dir, CATALOG_PREFIX)
        .map_err(|e| QaError::CatalogRead { path: dir.clone(), reason: e.to_string() })?;
    match found {
        Some(path) => load_catalog(&path),
        None => Err(QaError::CatalogRead { path: dir, reason: "no statistics file found".into() }),
    }
}

pub fn load_dataset(id: &str, path: &Path) -> Result<RawDataset, QaError> {
    let bytes = std::fs::read(path).map_err(|e| QaError::dataset_load(id, e))?;
    parse_dataset(id, &bytes)
}

pub fn save_corpus(paths: &DataPaths, corpus: &QaCorpus) -> Result<PathBuf> {
    create_dir_all(paths.data_dir())?;
    let path = paths.corpus_file();
    write_pretty(&path, corpus)?;
    Ok(path)
}

pub fn load_corpus(path: &Path) -> Result<QaCorpus> {
    let f = File::open(path)?;
    let corpus = serde_json::from_reader(BufReader::new(f))?;
    Ok(corpus)
}

/// Two-space indented JSON, replacing whatever was at `path`.
pub fn write_pretty<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let json = serde_json::to_string_pretty(value)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn stamps_sort_chronologically() {
        let a = file_stamp(datetime!(2025-03-11 04:23:45.733 UTC));
        let b = file_stamp(datetime!(2025-03-11 14:03:05.002 UTC));
        assert_eq!(a, "2025-03-11T04-23-45-733Z");
        assert!(a < b);
    }

    #[test]
    fn picks_lexically_last_match() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "dataset_12_2025-03-11T04-23-45-733Z.json",
            "dataset_12_2025-03-12T00-00-00-000Z.json",
            "dataset_12_2025-03-12T00-00-00-000Z.txt",
            "dataset_123_2030-01-01T00-00-00-000Z.json",
        ] {
            std::fs::write(dir.path().join(name), "[]").unwrap();
        }
        let latest = latest_with_prefix(dir.path(), &dataset_prefix("12")).unwrap().unwrap();
        assert_eq!(latest.file_name().and_then(|n| n.to_str()), Some("dataset_12_2025-03-12T00-00-00-000Z.json"));
        assert!(latest_with_prefix(dir.path(), &dataset_prefix("7")).unwrap().is_none());
    }

    #[test]
    fn missing_catalog_is_a_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        assert!(matches!(latest_catalog(&paths), Err(QaError::CatalogRead { .. })));
        std::fs::create_dir_all(paths.data_dir()).unwrap();
        std::fs::write(paths.catalog_file("2025"), "{").unwrap();
        assert!(matches!(latest_catalog(&paths), Err(QaError::CatalogRead { .. })));
    }
}
