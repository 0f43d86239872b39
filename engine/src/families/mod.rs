//! Statements reserved for known dataset families.
//!
//! A family is chosen purely by dataset id through [`FamilyRegistry`];
//! nothing about the data itself decides which specializer runs.

pub mod composition;
pub mod informal;
pub mod international;
pub mod regional;
pub mod sector;
pub mod transport;

use crate::config::FamilyConfig;
use crate::error::QaError;
use crate::format::fixed1;
use crate::qa::QaPair;
use crate::series::{CategoryValue, DatasetView};
use std::collections::HashMap;
use std::sync::Arc;

/// Label fragment of the national (republic-wide) row.
pub const NATIONAL: &str = "O'zbekiston";
/// Label fragment of aggregate rows.
pub const AGGREGATE: &str = "Jami";

pub trait Specializer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Family statements for one dataset. A missing expected row skips
    /// the statement that needed it, never the dataset.
    fn generate(&self, view: &DatasetView<'_>, dataset_id: &str, title: &str) -> Vec<QaPair>;
}

/// Every family this build knows, by configuration name.
pub fn by_name(name: &str) -> Option<Arc<dyn Specializer>> {
    let spec: Arc<dyn Specializer> = match name {
        "regional" => Arc::new(regional::RegionalPriceIndex),
        "international" => Arc::new(international::CisComparison),
        "consumer_basket" => Arc::new(composition::ConsumerBasket),
        "industrial_sectors" => Arc::new(composition::IndustrialSectors),
        "sector_growth" => Arc::new(sector::SectorGrowth),
        "transport" => Arc::new(transport::TransportServices),
        "informal_correlation" => Arc::new(informal::InformalCorrelation),
        "compound_growth" => Arc::new(informal::CompoundGrowth),
        "component_shares" => Arc::new(informal::ComponentShares),
        _ => return None,
    };
    Some(spec)
}

#[derive(Clone, Default)]
pub struct FamilyRegistry {
    by_id: HashMap<String, Arc<dyn Specializer>>,
}

impl FamilyRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn from_config(config: &FamilyConfig) -> Result<Self, QaError> {
        let mut registry = Self::new();
        for (family, ids) in &config.families {
            let spec = by_name(family)
                .ok_or_else(|| QaError::Config(format!("unknown family {family:?}")))?;
            for id in ids {
                if let Some(prev) = registry.by_id.get(id) {
                    return Err(QaError::Config(format!(
                        "dataset {id} registered to both {} and {family}",
                        prev.name()
                    )));
                }
                registry.register(id, spec.clone());
            }
        }
        Ok(registry)
    }

    /// The built-in id table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (family, ids) in &FamilyConfig::default().families {
            if let Some(spec) = by_name(family) {
                for id in ids {
                    registry.register(id, spec.clone());
                }
            }
        }
        registry
    }

    pub fn register(&mut self, dataset_id: &str, spec: Arc<dyn Specializer>) {
        self.by_id.insert(dataset_id.to_string(), spec);
    }

    pub fn get(&self, dataset_id: &str) -> Option<&dyn Specializer> {
        self.by_id.get(dataset_id).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize { self.by_id.len() }
    pub fn is_empty(&self) -> bool { self.by_id.is_empty() }
}

/// `Name (12.3%), Name (4.0%)`; `lower` lowercases the names as in running text.
pub(crate) fn percent_list<'a>(items: impl IntoIterator<Item = &'a CategoryValue>, lower: bool) -> String {
    items
        .into_iter()
        .map(|cv| format!("{}da ({}%)", display_name(&cv.category, lower), fixed1(cv.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn display_name(label: &str, lower: bool) -> String {
    if lower { label.to_lowercase() } else { label.to_string() }
}

/// Top three and bottom three (lowest first) of an already descending ranking.
pub(crate) fn top_bottom(ranked: &[CategoryValue]) -> (&[CategoryValue], Vec<&CategoryValue>) {
    let top = &ranked[..ranked.len().min(3)];
    let bottom = ranked.iter().rev().take(3).collect();
    (top, bottom)
}
