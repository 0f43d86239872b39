use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::config::FamilyConfig;
use engine::persist::{latest_catalog, save_corpus, DataPaths};
use engine::{Assembler, DirectorySource, FamilyRegistry, RunReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "generator")]
#[command(about = "Generate the Uzbek QA corpus from downloaded statistics datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the latest catalog and its downloads into data/qa_dataset.json
    Convert {
        /// Workspace root holding data/ and downloads/
        #[arg(long, default_value = ".")]
        root: String,
        /// JSON file mapping family names to dataset ids (replaces the built-in table)
        #[arg(long)]
        families: Option<String>,
    },
    /// Print the dataset id to family table in effect
    Families {
        #[arg(long)]
        families: Option<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { root, families } => {
            let Conversion { report, per_dataset, failures, output } =
                convert(Path::new(&root), families.as_deref().map(Path::new))?;
            for line in &per_dataset {
                println!("{line}");
            }
            println!("processed: {}", report.processed);
            println!("succeeded: {}", report.succeeded);
            println!("failed: {}", report.failed);
            println!("total pairs: {}", report.total_pairs);
            for failure in &failures {
                println!("  skipped {failure}");
            }
            println!("written to {}", output.display());
            Ok(())
        }
        Commands::Families { families } => {
            let config = family_config(families.as_deref().map(Path::new))?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn family_config(path: Option<&Path>) -> Result<FamilyConfig> {
    match path {
        Some(p) => FamilyConfig::load(p).with_context(|| format!("loading family table {}", p.display())),
        None => Ok(FamilyConfig::default()),
    }
}

struct Conversion {
    report: RunReport,
    per_dataset: Vec<String>,
    failures: Vec<String>,
    output: PathBuf,
}

fn convert(root: &Path, families: Option<&Path>) -> Result<Conversion> {
    let paths = DataPaths::new(root);
    let registry = FamilyRegistry::from_config(&family_config(families)?)?;
    let catalog = latest_catalog(&paths).context("resolving the dataset catalog")?;
    tracing::info!(datasets = catalog.content.datasets.len(), families = registry.len(), "catalog loaded");

    let source = DirectorySource::new(paths.downloads_dir("json"));
    let assembly = Assembler::new(registry).run(&catalog, &source);
    let report = assembly.report;
    let per_dataset: Vec<String> =
        assembly.generated.iter().map(|(id, n)| format!("dataset {id}: {n} pairs")).collect();
    let failures: Vec<String> = assembly.failures.iter().map(|(id, err)| format!("{id}: {err}")).collect();
    let corpus = assembly.into_corpus(&catalog.url);
    let output = save_corpus(&paths, &corpus)?;
    tracing::info!(output = %output.display(), pairs = report.total_pairs, "corpus written");
    Ok(Conversion { report, per_dataset, failures, output })
}
