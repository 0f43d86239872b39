mod download;
mod scrape;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use engine::persist::{file_stamp, latest_catalog, load_catalog, save_catalog, DataPaths};
use engine::Catalog;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Scrape the statistics dataset listing and download dataset files")]
struct Cli {
    /// Workspace root holding data/ and downloads/
    #[arg(long, default_value = ".", global = true)]
    root: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 60, global = true)]
    timeout_secs: u64,
    /// User-Agent string sent with every request
    #[arg(
        long,
        default_value = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        global = true
    )]
    user_agent: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the listing page into data/statistics_<timestamp>.json
    Catalog {
        #[arg(long, default_value = "https://stat.uz/uz/rasmiy-statistika/investments")]
        url: String,
        /// Total attempts before giving up
        #[arg(long, default_value_t = 3)]
        attempts: u32,
        /// Delay before the first retry; doubles after each further failure
        #[arg(long, default_value_t = 5)]
        retry_delay_secs: u64,
    },
    /// Download every dataset of a catalog that offers a JSON file
    Download {
        /// Catalog file; defaults to the newest data/statistics_*.json
        #[arg(long)]
        catalog: Option<String>,
        /// Only quarterly GDP, quarterly growth rates and informal economy datasets
        #[arg(long, default_value_t = false)]
        selected: bool,
        /// Pause between requests in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let cli = Cli::parse();
    let paths = DataPaths::new(&cli.root);
    let client = Client::builder()
        .user_agent(cli.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    match cli.command {
        Commands::Catalog { url, attempts, retry_delay_secs } => {
            let page = Url::parse(&url).with_context(|| format!("invalid page url {url}"))?;
            let catalog =
                scrape::fetch_catalog_with_retry(&client, &page, attempts.max(1), Duration::from_secs(retry_delay_secs))
                    .await?;
            let path = save_catalog(&paths, &catalog, &file_stamp(time::OffsetDateTime::now_utc()))?;
            tracing::info!(path = %path.display(), "catalog saved");
            print_catalog_summary(&catalog);
            Ok(())
        }
        Commands::Download { catalog, selected, delay_ms } => {
            let catalog = match catalog {
                Some(p) => load_catalog(Path::new(&p))?,
                None => latest_catalog(&paths)?,
            };
            let entries: Vec<_> = catalog
                .content
                .datasets
                .iter()
                .filter(|d| !selected || download::is_selected(&d.title))
                .collect();
            if selected {
                eprintln!("selected datasets: {}", entries.len());
            }

            let summary = download::download_all(&client, &paths, entries, Duration::from_millis(delay_ms)).await;
            println!("total: {}", summary.total());
            println!("succeeded: {}", summary.succeeded);
            println!("failed: {}", summary.failures.len());
            for (id, title, err) in &summary.failures {
                println!("- dataset {id} ({title}): {err}");
            }
            if summary.total() > 0 && summary.succeeded == 0 {
                bail!("no dataset could be downloaded");
            }
            Ok(())
        }
    }
}

fn print_catalog_summary(catalog: &Catalog) {
    let content = &catalog.content;
    println!("descriptions: {}", content.description.len());
    println!("datasets: {}", content.datasets.len());
    if let Some(first) = content.description.first() {
        println!("first description: {}...", first.chars().take(100).collect::<String>());
    }
    if let Some(first) = content.datasets.first() {
        let formats: Vec<&str> = first.files.keys().map(String::as_str).collect();
        println!("first dataset: {} - {} [{}]", first.id, first.title, formats.join(", "));
    }
}
