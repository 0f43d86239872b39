//! Which dataset ids belong to which family.
//!
//! The built-in table can be replaced by a JSON file of the same shape:
//! `{"families": {"regional": ["1287", "1288"], ...}}`.

use crate::error::QaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyConfig {
    pub families: BTreeMap<String, Vec<String>>,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("regional", &["1287", "1288"]),
            ("international", &["1576", "1577"]),
            ("consumer_basket", &["1285", "1286"]),
            ("industrial_sectors", &["1301", "1302"]),
            ("sector_growth", &["1320", "1321"]),
            ("transport", &["1327", "1329"]),
            ("informal_correlation", &["3840"]),
            ("compound_growth", &["3841"]),
            ("component_shares", &["3842"]),
        ];
        let families = table
            .iter()
            .map(|(name, ids)| (name.to_string(), ids.iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { families }
    }
}

impl FamilyConfig {
    pub fn empty() -> Self {
        Self { families: BTreeMap::new() }
    }

    pub fn load(path: &Path) -> Result<Self, QaError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| QaError::Config(format!("{}: {e}", path.display())))
    }
}
