//! Wind dataset ingester.
//!
//! Scans a directory of raw dataset folders (`<name>/meta.json` plus raw
//! sample files), builds one trixel index per dataset, and persists the
//! indexes for the query API. Datasets whose sources are unchanged since
//! the last run are skipped.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ingestion::{IngestConfig, IngestionPipeline};
use storage::Catalog;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "Trixel index builder for wind datasets")]
struct Args {
    /// Directory holding raw dataset folders
    #[arg(short, long, default_value = "data/unprocessed")]
    input: String,

    /// Directory receiving persisted indexes
    #[arg(short, long, default_value = "data/processed")]
    output: String,

    /// Leaf depth of the trixel mesh (overrides INGEST_MESH_DEPTH)
    #[arg(long)]
    mesh_depth: Option<usize>,

    /// Overview decimation stride (overrides INGEST_OVERVIEW_STRIDE)
    #[arg(long)]
    overview_stride: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = IngestConfig::from_env();
    if let Some(depth) = args.mesh_depth {
        config.mesh_depth = depth;
    }
    if let Some(stride) = args.overview_stride {
        config.overview_stride = stride.max(1);
    }

    info!(
        input = %args.input,
        output = %args.output,
        mesh_depth = config.mesh_depth,
        overview_stride = config.overview_stride,
        "Starting ingestion run"
    );

    let pipeline = IngestionPipeline::new(config, Catalog::new(&args.output));
    let report = pipeline.run(std::path::Path::new(&args.input))?;

    for (dataset, error) in &report.failed {
        tracing::warn!(dataset = %dataset, error = %error, "Dataset failed");
    }

    info!(
        ingested = report.ingested.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Ingestion run complete"
    );

    Ok(())
}
