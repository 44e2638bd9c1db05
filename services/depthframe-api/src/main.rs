//! DepthFrame API server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use depthframe_api::config::resolve_addr;
use depthframe_api::{build_router, AppState, ServiceConfig};

#[derive(Parser, Debug)]
#[command(name = "depthframe-api")]
#[command(about = "HTTP API serving colormapped depth-range frames")]
struct Args {
    /// Listen address (default: DPS_HOST:DPS_PORT)
    #[arg(short, long)]
    listen: Option<String>,

    /// SQLite database path (default: DPS_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build().context("Failed to create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    info!("Starting DepthFrame API server");
    let state = AppState::new(&config).await?.with_prometheus(prometheus_handle);

    match state.frames.metadata().await {
        Ok(meta) => info!(
            rows = meta.row_count,
            width = meta.width,
            depth_min = meta.depth_min,
            depth_max = meta.depth_max,
            "Dataset loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "Dataset unavailable; run the ingester first"),
    }

    let app = build_router(Arc::new(state));

    let addr: SocketAddr = match args.listen {
        Some(listen) => resolve_addr(&listen).await.context("Invalid --listen address")?,
        None => config.listen_addr().await?,
    };
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
