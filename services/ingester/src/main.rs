//! Scan data ingester.
//!
//! One-shot pipeline: reads the depth-indexed CSV export, cleans it, resizes
//! every row to the target width and writes rows plus provenance metadata to
//! the SQLite row store. Safe to re-run; existing depths are replaced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ingestion::{run_ingestion, IngestionConfig, InterpolationMethod};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "Ingest depth-indexed scan CSV data into the row store")]
struct Args {
    /// CSV file to ingest (default: DPS_DATA_DIR/DPS_CSV_FILENAME)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// SQLite database path (default: DPS_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Width rows are resized to (default: DPS_TARGET_WIDTH)
    #[arg(long)]
    target_width: Option<usize>,

    /// NEAREST, BILINEAR, BICUBIC, AREA or LANCZOS4 (default: DPS_INTERPOLATION_METHOD)
    #[arg(long)]
    interpolation: Option<String>,

    /// Log level
    #[arg(long, env = "DPS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Environment configuration with command-line overrides applied.
    fn into_config(self) -> Result<IngestionConfig> {
        let mut config = IngestionConfig::from_env().context("Invalid DPS_* environment")?;
        if let Some(csv) = self.csv {
            config.csv_override = Some(csv);
        }
        if let Some(db) = self.db {
            config.db_path = db;
        }
        if let Some(width) = self.target_width {
            config.target_width = width;
        }
        if let Some(name) = self.interpolation {
            config.interpolation = name.parse::<InterpolationMethod>()?;
        }
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = args.into_config()?;

    info!("==================================================");
    info!("Starting scan data ingestion");
    info!("==================================================");

    match run_ingestion(&config).await {
        Ok(summary) => {
            info!(
                rows = summary.rows_stored,
                width = summary.resized_width,
                depth_min = summary.report.depth_min,
                depth_max = summary.report.depth_max,
                db = %config.db_path.display(),
                "Ingestion finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            Err(e.into())
        }
    }
}
