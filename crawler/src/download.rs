//! Sequential dataset downloads and their plain-text renderings.

use anyhow::{anyhow, Context, Result};
use engine::document::parse_dataset;
use engine::format::grouped;
use engine::labels;
use engine::persist::{file_stamp, write_pretty, DataPaths};
use engine::{CatalogEntry, RawDataset};
use reqwest::Client;
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

const NON_PERIOD_KEYS: &[&str] = &["Code", "Klassifikator", "Klassifikator_ru", "Klassifikator_en"];
const MISSING: &str = "Ma'lumot mavjud emas";

/// Headline economic indicators: quarterly GDP, quarterly growth rates and
/// the informal economy.
pub fn is_selected(title: &str) -> bool {
    let t = labels::normalize(title).to_lowercase();
    (t.contains("yalpi ichki") && t.contains("choraklik"))
        || (t.contains("o'sish sur'at") && t.contains("choraklik"))
        || t.contains("norasmiy iqtisodiyot")
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Number(n) => n.as_f64().map(grouped).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Human-readable dump: title, periodicity, unit, then every row's values
/// with quarterly columns grouped under their year.
pub fn render_text(doc: &RawDataset) -> String {
    let meta = |name: &str| doc.metadata_en(name).unwrap_or(MISSING).to_string();
    let mut out = String::new();
    let _ = writeln!(out, "{}", meta("Data set name"));
    let _ = writeln!(out, "{}\n", "=".repeat(50));
    let _ = writeln!(out, "Davr: {}", meta("Periodicity"));
    let _ = writeln!(out, "O'lchov birligi: {}\n", meta("Unit of measurement"));

    if doc.data.is_empty() {
        out.push_str("Ma'lumotlar mavjud emas\n");
        return out;
    }
    for row in &doc.data {
        let label = row.get("Klassifikator").and_then(Value::as_str).unwrap_or("Noma'lum hudud");
        let _ = writeln!(out, "{label}:");
        let _ = writeln!(out, "{}", "-".repeat(30));

        let mut periods: Vec<&String> = row.keys().filter(|k| !NON_PERIOD_KEYS.contains(&k.as_str())).collect();
        periods.sort();
        let quarterly = periods.first().is_some_and(|p| p.contains('Q'));
        if quarterly {
            let mut current_year: Option<&str> = None;
            for p in &periods {
                let (year, quarter) = p.split_once('-').unwrap_or((p.as_str(), ""));
                if current_year != Some(year) {
                    let _ = writeln!(out, "\n{year}-yil:");
                    current_year = Some(year);
                }
                let _ = writeln!(out, "  {quarter}: {}", cell_text(&row[p.as_str()]));
            }
        } else {
            for p in &periods {
                let _ = writeln!(out, "{p}: {}", cell_text(&row[p.as_str()]));
            }
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub succeeded: usize,
    pub failures: Vec<(String, String, String)>, // id, title, error
}

impl DownloadSummary {
    pub fn total(&self) -> usize { self.succeeded + self.failures.len() }
}

/// Fetch one dataset, save it pretty-printed plus its text rendering.
pub async fn download_one(client: &Client, paths: &DataPaths, entry: &CatalogEntry) -> Result<PathBuf> {
    let url = entry.files.get("json").ok_or_else(|| anyhow!("no json file listed"))?;
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    let value: Value = serde_json::from_slice(&bytes).context("response is not JSON")?;

    let dir = paths.downloads_dir("json");
    fs::create_dir_all(&dir)?;
    let stamp = file_stamp(time::OffsetDateTime::now_utc());
    let json_path = paths.dataset_file(&entry.id, &stamp, "json");
    write_pretty(&json_path, &value)?;

    match parse_dataset(&entry.id, &bytes) {
        Ok(doc) => fs::write(paths.dataset_file(&entry.id, &stamp, "txt"), render_text(&doc))?,
        Err(err) => tracing::warn!(dataset_id = %entry.id, error = %err, "no text rendering"),
    }
    Ok(json_path)
}

/// Downloads every entry that lists a JSON file, one at a time with
/// `delay` between requests. Failures are collected, never fatal.
pub async fn download_all<'a>(
    client: &Client,
    paths: &DataPaths,
    entries: impl IntoIterator<Item = &'a CatalogEntry>,
    delay: Duration,
) -> DownloadSummary {
    let mut summary = DownloadSummary::default();
    for entry in entries.into_iter().filter(|e| e.files.contains_key("json")) {
        eprintln!("downloading {} - {:?}", entry.id, entry.title);
        match download_one(client, paths, entry).await {
            Ok(path) => {
                tracing::info!(dataset_id = %entry.id, path = %path.display(), "saved");
                summary.succeeded += 1;
            }
            Err(err) => {
                tracing::warn!(dataset_id = %entry.id, error = %err, "download failed");
                summary.failures.push((entry.id.clone(), entry.title.clone(), format!("{err:#}")));
            }
        }
        sleep(delay).await;
    }
    summary
}
