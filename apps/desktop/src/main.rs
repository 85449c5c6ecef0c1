use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    project_export_with, ExportOptions, ExportQuoting, HttpAnalysisClient, InputCollector,
    RequestOrchestrator, RequestState,
};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod download;
mod ui;

use config::{load_settings, normalize_endpoint, Settings, DEFAULT_CONFIG_FILE};

/// Submit location queries to the analysis service and browse the results.
#[derive(Parser, Debug)]
struct Args {
    /// Settings file; ignored when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Analysis endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,
    /// Directory CSV exports are written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// CSV quoting: `necessary` or `non_numeric`.
    #[arg(long)]
    quoting: Option<ExportQuoting>,
    /// Run a single query and exit instead of starting the console.
    #[arg(long)]
    query: Option<String>,
    /// Spreadsheet to upload with `--query`.
    #[arg(long, requires = "query")]
    file: Option<PathBuf>,
    /// Write the result table as CSV after a successful `--query`.
    #[arg(long, requires = "query")]
    export: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    tracing::debug!(?settings, "settings resolved");

    match args.query {
        Some(query) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_once(&settings, query, args.file, args.export))
        }
        None => ui::console::run(&settings),
    }
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings(&args.config)?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = normalize_endpoint(endpoint)?;
    }
    if let Some(dir) = &args.export_dir {
        settings.export_dir = dir.clone();
    }
    if let Some(quoting) = args.quoting {
        settings.export_quoting = quoting;
    }
    Ok(settings)
}

async fn run_once(
    settings: &Settings,
    query: String,
    file: Option<PathBuf>,
    export: bool,
) -> Result<()> {
    let client = HttpAnalysisClient::new(&settings.endpoint);
    let mut input = InputCollector::new();
    input.set_text(query);
    if let Some(path) = file {
        let attachment = input.attach_file(&path)?;
        println!("{}", ui::render::render_attachment(Some(attachment)));
    }

    let mut orchestrator = RequestOrchestrator::new();
    let state = orchestrator.submit(&client, &input.snapshot()).await;
    println!("{}", ui::render::render_state(state));

    match state {
        RequestState::Succeeded { query, result } if export => {
            let options = ExportOptions {
                quoting: settings.export_quoting,
            };
            match project_export_with(result, query, &options)? {
                Some(document) => {
                    let path = download::save_document(&settings.export_dir, &document)?;
                    println!("Exported {}", path.display());
                }
                None => println!("Nothing to export: the table is empty."),
            }
            Ok(())
        }
        RequestState::Failed(failure) => bail!("{}", failure.message()),
        _ => Ok(()),
    }
}
