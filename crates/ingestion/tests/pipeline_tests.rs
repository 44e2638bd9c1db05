//! End-to-end tests for the ingestion pipeline.
//!
//! Each test writes a CSV into a temp directory, runs the pipeline against a
//! fresh SQLite file, then reads the results back through the row store.

use std::path::{Path, PathBuf};

use ingestion::{run_ingestion, IngestionConfig, IngestionError, InterpolationMethod};
use storage::{keys, RowStore, SqliteRowStore};
use tempfile::TempDir;
use test_utils::{assert_approx_eq, create_csv, create_scan_csv, pixel_at, require_test_file};

fn config_for(dir: &TempDir, csv: PathBuf, original_width: usize, target_width: usize) -> IngestionConfig {
    IngestionConfig {
        data_dir: dir.path().to_path_buf(),
        db_path: dir.path().join("db").join("image_store.db"),
        original_width,
        target_width,
        csv_override: Some(csv),
        ..Default::default()
    }
}

fn write_csv(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

async fn open_store(path: &Path) -> SqliteRowStore {
    SqliteRowStore::open(path).await.unwrap()
}

// ============================================================================
// Failure modes
// ============================================================================

#[tokio::test]
async fn test_missing_csv_fails_without_creating_rows() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, dir.path().join("absent.csv"), 4, 4);

    let err = run_ingestion(&config).await.unwrap_err();
    assert!(matches!(err, IngestionError::DataFileNotFound(_)));
    assert!(err.to_string().contains("absent.csv"));
    assert!(!config.db_path.exists());
}

#[tokio::test]
async fn test_zero_target_width_rejected() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "scan.csv", &create_scan_csv(1.0, 1.0, 3, 4));
    let config = config_for(&dir, csv, 4, 0);

    assert!(matches!(
        run_ingestion(&config).await,
        Err(IngestionError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn test_only_null_rows_reports_no_data() {
    let dir = TempDir::new().unwrap();
    let text = create_csv(&[(None, vec![]), (None, vec![])], 3);
    let csv = write_csv(&dir, "nulls.csv", &text);
    let config = config_for(&dir, csv, 3, 3);

    assert!(matches!(run_ingestion(&config).await, Err(IngestionError::NoData)));
}

// ============================================================================
// Cleaning
// ============================================================================

#[tokio::test]
async fn test_cleaning_drops_nulls_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let text = create_csv(
        &[
            (Some(3.0), vec![Some(30.0), Some(31.0)]),
            (None, vec![]),
            (Some(1.0), vec![Some(10.0), None]),
            (Some(2.0), vec![Some(20.0), Some(21.0)]),
            (Some(3.0), vec![Some(99.0), Some(99.0)]),
            (None, vec![Some(5.0), Some(5.0)]),
        ],
        2,
    );
    let csv = write_csv(&dir, "messy.csv", &text);
    let config = config_for(&dir, csv, 2, 2);

    let summary = run_ingestion(&config).await.unwrap();
    assert_eq!(summary.report.raw_rows, 6);
    assert_eq!(summary.report.null_rows_dropped, 1);
    assert_eq!(summary.report.duplicate_depths_dropped, 1);
    assert_eq!(summary.report.clean_rows, 3);
    assert_eq!(summary.rows_stored, 3);
    assert!(summary.report.is_monotonic);

    let store = open_store(&config.db_path).await;
    let rows = store.rows_in_range(0.0, 10.0).await.unwrap();
    let depths: Vec<f64> = rows.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![1.0, 2.0, 3.0]);

    // Missing cell took the row mean; the first of the duplicate depths won
    assert_eq!(rows[0].pixels, vec![10, 10]);
    assert_eq!(rows[2].pixels, vec![30, 31]);
}

#[tokio::test]
async fn test_out_of_range_pixels_are_clipped() {
    let dir = TempDir::new().unwrap();
    let text = create_csv(&[(Some(1.0), vec![Some(-20.0), Some(400.0), Some(128.0)])], 3);
    let csv = write_csv(&dir, "clip.csv", &text);
    let config = config_for(&dir, csv, 3, 3);

    run_ingestion(&config).await.unwrap();

    let store = open_store(&config.db_path).await;
    let rows = store.rows_in_range(1.0, 1.0).await.unwrap();
    assert_eq!(rows[0].pixels, vec![0, 255, 128]);
    assert_eq!(
        store.get_metadata_value(keys::PIXEL_RANGE_ORIGINAL).await.unwrap().as_deref(),
        Some("[-20, 400]")
    );
}

// ============================================================================
// Resizing
// ============================================================================

#[tokio::test]
async fn test_same_width_stores_pixels_verbatim() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "scan.csv", &create_scan_csv(100.0, 0.5, 20, 8));
    let config = IngestionConfig {
        interpolation: InterpolationMethod::Bicubic,
        ..config_for(&dir, csv, 8, 8)
    };

    run_ingestion(&config).await.unwrap();

    let store = open_store(&config.db_path).await;
    let rows = store.rows_in_range(100.0, 200.0).await.unwrap();
    assert_eq!(rows.len(), 20);
    for (i, row) in rows.iter().enumerate() {
        let expected: Vec<u8> = (0..8).map(|c| pixel_at(i, c)).collect();
        assert_eq!(row.pixels, expected, "row {}", i);
    }
}

#[tokio::test]
async fn test_area_downsample_200_to_150() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<(Option<f64>, Vec<Option<f64>>)> = (0..10)
        .map(|i| (Some(9000.0 + i as f64), vec![Some((i * 20) as f64); 200]))
        .collect();
    let csv = write_csv(&dir, "Challenge2.csv", &create_csv(&rows, 200));
    let config = config_for(&dir, csv, 200, 150);

    let summary = run_ingestion(&config).await.unwrap();
    assert_eq!(summary.resized_width, 150);

    let store = open_store(&config.db_path).await;
    let stored = store.rows_in_range(9000.0, 9009.0).await.unwrap();
    assert_eq!(stored.len(), 10);
    for (i, row) in stored.iter().enumerate() {
        assert_eq!(row.width(), 150);
        // Averaging a constant row leaves it unchanged
        assert!(row.pixels.iter().all(|&p| p as usize == i * 20), "row {}", i);
    }

    let metadata = store.get_metadata().await.unwrap();
    assert_eq!(metadata.width, 150);
    assert_eq!(metadata.original_width, Some(200));
    assert_eq!(metadata.interpolation_method.as_deref(), Some("AREA"));
}

// ============================================================================
// Metadata and re-runs
// ============================================================================

#[tokio::test]
async fn test_metadata_written() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "scan.csv", &create_scan_csv(9000.0, 0.1, 50, 6));
    let config = config_for(&dir, csv, 6, 3);

    run_ingestion(&config).await.unwrap();

    let store = open_store(&config.db_path).await;
    let all = store.all_metadata().await.unwrap();
    for key in [
        keys::ORIGINAL_WIDTH,
        keys::RESIZED_WIDTH,
        keys::DEPTH_MIN,
        keys::DEPTH_MAX,
        keys::DEPTH_STEP,
        keys::ROW_COUNT,
        keys::INTERPOLATION_METHOD,
        keys::SOURCE_FILE,
        keys::PIXEL_RANGE_ORIGINAL,
        keys::VALIDATION_SUMMARY,
        keys::INGESTED_AT,
    ] {
        assert!(all.contains_key(key), "missing metadata key {}", key);
    }

    assert_eq!(all[keys::SOURCE_FILE], "scan.csv");
    assert_eq!(all[keys::ROW_COUNT], "50");
    let step: f64 = all[keys::DEPTH_STEP].parse().unwrap();
    assert_approx_eq!(step, 0.1, 1e-6);

    let summary: serde_json::Value = serde_json::from_str(&all[keys::VALIDATION_SUMMARY]).unwrap();
    assert_eq!(summary["raw_rows"], 50);
    assert_eq!(summary["clean_rows"], 50);
    assert_eq!(summary["is_monotonic"], true);

    let metadata = store.get_metadata().await.unwrap();
    assert_eq!(metadata.row_count, 50);
    assert_approx_eq!(metadata.depth_min, 9000.0, 1e-9);
    assert_approx_eq!(metadata.depth_max, 9004.9, 1e-6);
}

#[tokio::test]
async fn test_single_row_has_no_depth_step() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "one.csv", &create_scan_csv(5.0, 1.0, 1, 4));
    let config = config_for(&dir, csv, 4, 4);

    run_ingestion(&config).await.unwrap();

    let store = open_store(&config.db_path).await;
    assert_eq!(store.get_metadata_value(keys::DEPTH_STEP).await.unwrap(), None);
    assert_eq!(store.row_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "scan.csv", &create_scan_csv(1.0, 1.0, 25, 4));
    let config = config_for(&dir, csv, 4, 4);

    run_ingestion(&config).await.unwrap();
    run_ingestion(&config).await.unwrap();

    let store = open_store(&config.db_path).await;
    assert_eq!(store.row_count().await.unwrap(), 25);
    assert_eq!(store.depth_bounds().await.unwrap(), Some((1.0, 25.0)));
}

// ============================================================================
// Reference data
// ============================================================================

#[tokio::test]
async fn test_reference_csv() {
    let csv = require_test_file!("Challenge2.csv");
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, csv, 200, 150);

    let summary = run_ingestion(&config).await.unwrap();
    assert_eq!(summary.report.original_width, 200);
    assert!(summary.report.is_monotonic);

    let store = open_store(&config.db_path).await;
    let metadata = store.get_metadata().await.unwrap();
    assert_eq!(metadata.width, 150);
    assert_eq!(metadata.row_count as usize, summary.rows_stored);
}
