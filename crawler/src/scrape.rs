//! Statistics listing page to dataset catalog.

use anyhow::{anyhow, bail, Result};
use engine::{Catalog, CatalogEntry};
use engine::document::CatalogContent;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;

pub const FILE_TYPES: &[&str] = &["xlsx", "xls", "pdf", "csv", "json", "xml"];
const TITLE_TAGS: &[&str] = &["h2", "h3", "h4", "p", "div"];

lazy_static! {
    static ref DATASET_ID: Regex = Regex::new(r"sdmx_data_(\d+)").unwrap();
    static ref FILE_NAME: Regex = Regex::new(r"(?i)\.(xlsx|xls|pdf|csv|json|xml)$").unwrap();
    static ref BARE_DATE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e:?}"))
}

pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Text of the closest heading-like sibling preceding the link or one of
/// its ancestors.
fn nearest_title(link: ElementRef<'_>) -> Option<String> {
    let mut parent = link.parent().and_then(ElementRef::wrap);
    while let Some(el) = parent {
        if let Some(prev) = el.prev_siblings().find_map(ElementRef::wrap) {
            if TITLE_TAGS.contains(&prev.value().name()) {
                let text = element_text(prev);
                if !text.is_empty() && !FILE_NAME.is_match(&text) {
                    return Some(text);
                }
            }
        }
        parent = el.parent().and_then(ElementRef::wrap);
    }
    None
}

fn file_type(url: &Url) -> Option<String> {
    let ext = url.path().rsplit('.').next()?.to_lowercase();
    FILE_TYPES.contains(&ext.as_str()).then_some(ext)
}

/// Build a catalog from the listing page HTML. Datasets come out sorted by id.
pub fn parse_catalog(html: &str, page_url: &Url) -> Result<Catalog> {
    let doc = Html::parse_document(html);

    let mut datasets: BTreeMap<String, CatalogEntry> = BTreeMap::new();
    for link in doc.select(&selector(r#"a[href*="sdmx_data_"]"#)?) {
        let Some(href) = link.value().attr("href") else { continue };
        let Ok(url) = page_url.join(href) else { continue };
        let Some(kind) = file_type(&url) else { continue };
        let Some(id) = DATASET_ID.captures(url.as_str()).map(|c| c[1].to_string()) else { continue };

        let entry = datasets.entry(id.clone()).or_insert_with(|| CatalogEntry {
            title: nearest_title(link).unwrap_or_else(|| format!("Ma'lumotlar to'plami {id}")),
            id,
            files: BTreeMap::new(),
        });
        entry.files.insert(kind, url.to_string());
    }

    let description: Vec<String> = doc
        .select(&selector(".item-page p, .item-page div.text-justify")?)
        .map(element_text)
        .filter(|t| !t.is_empty() && !BARE_DATE.is_match(t) && !FILE_NAME.is_match(t))
        .collect();

    let title = [".page-header", "h1", "title"]
        .iter()
        .filter_map(|css| selector(css).ok())
        .find_map(|sel| doc.select(&sel).next().map(element_text))
        .unwrap_or_default();

    if datasets.is_empty() {
        bail!("no datasets found on {page_url}");
    }
    Ok(Catalog {
        url: page_url.to_string(),
        title,
        content: CatalogContent { description, datasets: datasets.into_values().collect() },
    })
}

pub async fn fetch_catalog(client: &Client, page_url: &Url) -> Result<Catalog> {
    let resp = client.get(page_url.clone()).send().await?.error_for_status()?;
    let final_url = resp.url().clone();
    let body = resp.text().await?;
    parse_catalog(&body, &final_url)
}

/// `attempts` tries, sleeping `initial_delay` after the first failure and
/// doubling after each further one.
pub async fn fetch_catalog_with_retry(
    client: &Client,
    page_url: &Url,
    attempts: u32,
    initial_delay: Duration,
) -> Result<Catalog> {
    let mut delay = initial_delay;
    let mut attempt = 1;
    loop {
        match fetch_catalog(client, page_url).await {
            Ok(catalog) => return Ok(catalog),
            Err(err) if attempt < attempts => {
                eprintln!("retry {attempt}/{attempts} in {}s: {err}", delay.as_secs());
                sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(err) => return Err(err.context(format!("scraping failed after {attempts} attempts"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Investitsiyalar</title></head><body>
        <h1 class="page-header"> Investitsiyalar
            statistikasi </h1>
        <div class="item-page">
            <p>Asosiy kapitalga   investitsiyalar.</p>
            <p>11/03/2025</p>
            <p>sdmx_data_1288.xlsx</p>
            <div>
                <h3>Hududlar bo'yicha investitsiyalar</h3>
                <ul>
                    <li><a href="/media/sdmx_data_1288.json">JSON</a></li>
                    <li><a href="/media/sdmx_data_1288.xlsx">XLSX</a></li>
                    <li><a href="/media/sdmx_data_1288.docx">DOCX</a></li>
                </ul>
            </div>
            <div><span><a href="https://files.stat.uz/sdmx_data_1287.csv">CSV</a></span></div>
        </div>
        </body></html>"#;

    #[test]
    fn groups_files_by_dataset_id() {
        let base = Url::parse("https://stat.uz/uz/rasmiy-statistika/investments").unwrap();
        let catalog = parse_catalog(PAGE, &base).unwrap();

        assert_eq!(catalog.title, "Investitsiyalar statistikasi");
        assert_eq!(catalog.content.description, vec!["Asosiy kapitalga investitsiyalar."]);
        let ids: Vec<&str> = catalog.content.datasets.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1287", "1288"]);

        let regional = &catalog.content.datasets[1];
        assert_eq!(regional.title, "Hududlar bo'yicha investitsiyalar");
        assert_eq!(regional.files.get("json").map(String::as_str), Some("https://stat.uz/media/sdmx_data_1288.json"));
        assert!(regional.files.contains_key("xlsx"));
        assert!(!regional.files.contains_key("docx"));
    }

    #[test]
    fn untitled_dataset_gets_default_title() {
        let base = Url::parse("https://stat.uz/").unwrap();
        let catalog = parse_catalog(r#"<a href="sdmx_data_5.json">x</a>"#, &base).unwrap();
        assert_eq!(catalog.content.datasets[0].title, "Ma'lumotlar to'plami 5");
    }

    #[test]
    fn page_without_datasets_is_an_error() {
        let base = Url::parse("https://stat.uz/").unwrap();
        assert!(parse_catalog("<p>bo'sh</p>", &base).is_err());
    }
}
