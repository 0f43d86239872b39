use std::path::PathBuf;
use thiserror::Error;

/// Failures of a corpus run.
///
/// Only `CatalogRead` aborts a run; the per-dataset variants are counted
/// by the assembler and the loop moves on. Undefined arithmetic (zero
/// growth base, constant series) is not an error at all: the affected
/// statement is simply not emitted.
#[derive(Debug, Error)]
pub enum QaError {
    #[error("cannot read catalog {path}: {reason}")]
    CatalogRead { path: PathBuf, reason: String },

    #[error("dataset {id}: cannot load raw document: {reason}")]
    DatasetLoad { id: String, reason: String },

    #[error("dataset {id}: generation failed: {reason}")]
    Generation { id: String, reason: String },

    #[error("invalid family configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QaError {
    pub fn dataset_load(id: &str, reason: impl ToString) -> Self {
        QaError::DatasetLoad { id: id.to_string(), reason: reason.to_string() }
    }

    pub fn generation(id: &str, reason: impl ToString) -> Self {
        QaError::Generation { id: id.to_string(), reason: reason.to_string() }
    }
}
