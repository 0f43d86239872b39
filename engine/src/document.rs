//! Wire shapes of the scraped catalog and of a downloaded dataset.

use crate::error::QaError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One listed dataset: id, human title, and download URL per file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogContent {
    #[serde(default)]
    pub description: Vec<String>,
    pub datasets: Vec<CatalogEntry>,
}

/// Scraper output, stored as `statistics_<timestamp>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub content: CatalogContent,
}

/// Free-form descriptor record from a dataset's `metadata` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_uz: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value_uz: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_en: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A data row: `Klassifikator` plus one key per period, in source order.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataset {
    pub metadata: Vec<MetadataRecord>,
    pub data: Vec<Row>,
}

impl RawDataset {
    pub fn metadata_uz(&self, name_uz: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.name_uz == name_uz)
            .map(|m| m.value_uz.as_str())
    }

    pub fn metadata_en(&self, name_en: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.name_en == name_en)
            .map(|m| m.value_uz.as_str())
    }
}

/// Parse a downloaded document: a JSON array holding exactly one dataset.
pub fn parse_dataset(dataset_id: &str, bytes: &[u8]) -> Result<RawDataset, QaError> {
    let mut docs: Vec<RawDataset> =
        serde_json::from_slice(bytes).map_err(|e| QaError::dataset_load(dataset_id, e))?;
    if docs.len() != 1 {
        return Err(QaError::dataset_load(
            dataset_id,
            format!("expected exactly one dataset element, found {}", docs.len()),
        ));
    }
    Ok(docs.remove(0))
}

fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_element_document() {
        let raw = br#"[{
            "metadata": [
                {"name_uz": "Davriylik", "value_uz": "Yillik", "name_en": "Periodicity", "name_ru": "x"},
                {"name_uz": "Kod", "value_uz": 17, "name_en": "Code"}
            ],
            "data": [{"Klassifikator": "A", "2020": 1.5, "2021": "-"}]
        }]"#;
        let doc = parse_dataset("1", raw).unwrap();
        assert_eq!(doc.metadata_en("Periodicity"), Some("Yillik"));
        assert_eq!(doc.metadata_uz("Kod"), Some("17"));
        assert_eq!(doc.metadata[0].extra.get("name_ru").and_then(|v| v.as_str()), Some("x"));
        let keys: Vec<&str> = doc.data[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["Klassifikator", "2020", "2021"]);
    }

    #[test]
    fn rejects_missing_sections_and_wrong_arity() {
        assert!(matches!(
            parse_dataset("7", br#"[{"data": []}]"#),
            Err(QaError::DatasetLoad { .. })
        ));
        assert!(matches!(parse_dataset("7", b"[]"), Err(QaError::DatasetLoad { .. })));
        assert!(matches!(parse_dataset("7", b"not json"), Err(QaError::DatasetLoad { .. })));
    }

    #[test]
    fn catalog_shape() {
        let raw = r#"{
            "url": "https://stat.uz/uz/rasmiy-statistika/investments",
            "title": "Investitsiyalar",
            "content": {
                "description": ["Matn"],
                "datasets": [{"id": "1287", "title": "Narx indeksi", "files": {"json": "https://x/sdmx_data_1287.json"}}]
            }
        }"#;
        let cat: Catalog = serde_json::from_str(raw).unwrap();
        assert_eq!(cat.content.datasets[0].files["json"], "https://x/sdmx_data_1287.json");
    }
}
