//! Common test fixtures.
//!
//! The reference dataset spans depths 9000.0 to 9546.0 at a 0.1 step,
//! resized from 200 to 150 pixels per row.

use std::sync::Arc;

use storage::{keys, MemoryRowStore, SqliteRowStore};

use crate::generators::create_scan_rows;

/// Shape of the reference dataset.
pub mod dataset {
    pub const DEPTH_MIN: f64 = 9000.0;
    pub const DEPTH_MAX: f64 = 9546.0;
    pub const DEPTH_STEP: f64 = 0.1;
    pub const ROW_COUNT: usize = 5461;
    pub const ORIGINAL_WIDTH: usize = 200;
    pub const WIDTH: usize = 150;
}

/// In-memory store holding the full reference dataset.
pub async fn reference_memory_store() -> Arc<MemoryRowStore> {
    let rows = create_scan_rows(
        dataset::DEPTH_MIN,
        dataset::DEPTH_STEP,
        dataset::ROW_COUNT,
        dataset::WIDTH,
    );
    let store = MemoryRowStore::from_rows(rows).expect("generated rows share a width");
    store
        .set_metadata(keys::RESIZED_WIDTH, &dataset::WIDTH.to_string())
        .await;
    store
        .set_metadata(keys::ORIGINAL_WIDTH, &dataset::ORIGINAL_WIDTH.to_string())
        .await;
    store
        .set_metadata(keys::DEPTH_STEP, &dataset::DEPTH_STEP.to_string())
        .await;
    store.set_metadata(keys::INTERPOLATION_METHOD, "AREA").await;
    store.set_metadata(keys::SOURCE_FILE, "Challenge2.csv").await;
    Arc::new(store)
}

/// In-memory SQLite store holding `count` generated rows.
pub async fn populated_sqlite_store(start: f64, step: f64, count: usize, width: usize) -> SqliteRowStore {
    let store = SqliteRowStore::open_memory()
        .await
        .expect("in-memory database");
    store
        .bulk_insert_rows(&create_scan_rows(start, step, count, width))
        .await
        .expect("insert generated rows");
    store
        .set_metadata(keys::RESIZED_WIDTH, &width.to_string())
        .await
        .expect("write metadata");
    store
}
