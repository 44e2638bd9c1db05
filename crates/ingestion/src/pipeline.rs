//! Ingestion orchestration: load, validate, resize, store.

use chrono::Utc;
use depth_common::ScanRow;
use serde::Serialize;
use serde_json::json;
use storage::{keys, SqliteRowStore};
use tracing::{info, warn};

use crate::config::IngestionConfig;
use crate::csv::load_csv;
use crate::error::{IngestionError, Result};
use crate::resize::{resize_rows, InterpolationMethod};
use crate::validate::{validate_and_clean, ValidationReport};

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub rows_stored: usize,
    pub resized_width: usize,
    pub report: ValidationReport,
}

/// Write resized rows and provenance metadata.
///
/// Rows at depths that already exist are replaced, so re-running
/// ingestion on the same file is idempotent.
pub async fn store_rows(
    store: &SqliteRowStore,
    depths: &[f64],
    resized: &[u8],
    width: usize,
    report: &ValidationReport,
    interpolation: InterpolationMethod,
    source_file: &str,
) -> Result<usize> {
    if width == 0 || depths.len() * width != resized.len() {
        return Err(IngestionError::InvalidConfig(format!(
            "{} rows do not fit {} bytes at width {}",
            depths.len(),
            resized.len(),
            width
        )));
    }

    let rows: Vec<ScanRow> = depths
        .iter()
        .zip(resized.chunks_exact(width))
        .map(|(&depth, px)| ScanRow::new(depth, px.to_vec()))
        .collect();
    let row_count = store.bulk_insert_rows(&rows).await?;

    let summary = json!({
        "raw_rows": report.raw_rows,
        "clean_rows": report.clean_rows,
        "null_rows_dropped": report.null_rows_dropped,
        "duplicate_depths_dropped": report.duplicate_depths_dropped,
        "is_monotonic": report.is_monotonic,
    });

    let mut metadata: Vec<(&str, String)> = vec![
        (keys::ORIGINAL_WIDTH, report.original_width.to_string()),
        (keys::RESIZED_WIDTH, width.to_string()),
        (keys::DEPTH_MIN, report.depth_min.to_string()),
        (keys::DEPTH_MAX, report.depth_max.to_string()),
        (keys::ROW_COUNT, row_count.to_string()),
        (keys::INTERPOLATION_METHOD, interpolation.to_string()),
        (keys::SOURCE_FILE, source_file.to_string()),
        (
            keys::PIXEL_RANGE_ORIGINAL,
            format!("[{:.0}, {:.0}]", report.pixel_min, report.pixel_max),
        ),
        (keys::VALIDATION_SUMMARY, summary.to_string()),
        (keys::INGESTED_AT, Utc::now().to_rfc3339()),
    ];
    if let Some(step) = report.depth_step {
        metadata.push((keys::DEPTH_STEP, step.to_string()));
    }

    for (key, value) in &metadata {
        store.set_metadata(key, value).await?;
    }

    info!(rows = row_count, metadata_entries = metadata.len(), "Stored scan rows");
    Ok(row_count)
}

/// Run the full pipeline described by `config`.
pub async fn run_ingestion(config: &IngestionConfig) -> Result<IngestionSummary> {
    config.validate()?;
    let csv_path = config.csv_path();
    info!(
        csv = %csv_path.display(),
        db = %config.db_path.display(),
        target_width = config.target_width,
        interpolation = %config.interpolation,
        "Starting ingestion pipeline"
    );

    let target_width = config.target_width;
    let original_width = config.original_width;
    let method = config.interpolation;

    // Parsing and resampling are CPU-bound
    let (clean, resized) = tokio::task::spawn_blocking(move || -> Result<_> {
        let table = load_csv(&csv_path)?;
        let clean = validate_and_clean(table)?;
        if clean.width != original_width {
            warn!(
                expected = original_width,
                actual = clean.width,
                "CSV width differs from configured original width"
            );
        }
        let resized = resize_rows(&clean.pixels, clean.width, target_width, method);
        Ok((clean, resized))
    })
    .await
    .map_err(|e| IngestionError::Task(e.to_string()))??;

    let store = SqliteRowStore::open(&config.db_path).await?;
    let rows_stored = store_rows(
        &store,
        &clean.depths,
        &resized,
        target_width,
        &clean.report,
        method,
        &config.source_file(),
    )
    .await?;
    store.close().await;

    info!(rows = rows_stored, "Ingestion complete");

    Ok(IngestionSummary {
        rows_stored,
        resized_width: target_width,
        report: clean.report,
    })
}
