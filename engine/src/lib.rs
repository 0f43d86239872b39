pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod families;
pub mod format;
pub mod generic;
pub mod labels;
pub mod numeric;
pub mod persist;
pub mod qa;
pub mod series;
pub mod trends;

pub use corpus::{generate_for_dataset, Assembler, Assembly, DatasetSource, DirectorySource, MemorySource, RunReport};
pub use document::{Catalog, CatalogEntry, RawDataset};
pub use error::QaError;
pub use families::{FamilyRegistry, Specializer};
pub use qa::{QaCorpus, QaPair};
pub use series::DatasetView;
