use anyhow::{Context, Result};
use clap::Parser;
use server::{build_app, ServiceConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// Serves the generated QA corpus and per-dataset growth trends.
#[derive(Parser)]
struct Args {
    /// Workspace root holding data/qa_dataset.json and downloads/json
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let config = ServiceConfig::from_env(&args.root);
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, corpus reload disabled");
    }
    let app = build_app(&config).with_context(|| format!("no corpus under {}", args.root.display()))?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, root = %args.root.display(), origins = config.allowed_origins.len(), "corpus server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
