//! In-process row store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use depth_common::{DatasetMetadata, DepthFrameError, DepthFrameResult, ScanRow};
use tokio::sync::RwLock;

use crate::metadata::build_metadata;
use crate::row_store::RowStore;

/// Row store holding everything in memory, sorted by depth.
#[derive(Default)]
pub struct MemoryRowStore {
    rows: RwLock<Vec<ScanRow>>,
    metadata: RwLock<BTreeMap<String, String>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from arbitrary rows. Later rows replace earlier rows at
    /// the same depth.
    pub fn from_rows(rows: Vec<ScanRow>) -> DepthFrameResult<Self> {
        Ok(Self {
            rows: RwLock::new(merge_rows(Vec::new(), rows)?),
            metadata: RwLock::default(),
        })
    }

    pub async fn insert_rows(&self, rows: Vec<ScanRow>) -> DepthFrameResult<usize> {
        let count = rows.len();
        let mut guard = self.rows.write().await;
        let existing = std::mem::take(&mut *guard);
        *guard = merge_rows(existing, rows)?;
        Ok(count)
    }

    pub async fn set_metadata(&self, key: &str, value: &str) {
        self.metadata
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }
}

fn merge_rows(mut existing: Vec<ScanRow>, incoming: Vec<ScanRow>) -> DepthFrameResult<Vec<ScanRow>> {
    let expected = existing.first().or(incoming.first()).map(|r| r.width());
    if let Some(expected) = expected {
        if let Some(bad) = incoming.iter().find(|r| r.width() != expected) {
            return Err(DepthFrameError::InconsistentWidth {
                depth: bad.depth,
                expected,
                actual: bad.width(),
            });
        }
    }

    for row in incoming {
        if !row.depth.is_finite() {
            return Err(DepthFrameError::DatabaseError(format!(
                "Non-finite depth key: {}",
                row.depth
            )));
        }
        match existing.binary_search_by(|r| r.depth.total_cmp(&row.depth)) {
            Ok(idx) => existing[idx] = row,
            Err(idx) => existing.insert(idx, row),
        }
    }
    Ok(existing)
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn rows_in_range(&self, depth_min: f64, depth_max: f64) -> DepthFrameResult<Vec<ScanRow>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|r| r.depth >= depth_min && r.depth <= depth_max)
            .cloned()
            .collect())
    }

    async fn get_metadata(&self) -> DepthFrameResult<DatasetMetadata> {
        let rows = self.rows.read().await;
        let bounds = rows.first().zip(rows.last()).map(|(a, b)| (a.depth, b.depth));
        let first_width = rows.first().map(|r| r.width());
        let entries = self.metadata.read().await.clone();
        build_metadata(entries, rows.len() as u64, bounds, first_width)
    }

    async fn depth_bounds(&self) -> DepthFrameResult<Option<(f64, f64)>> {
        let rows = self.rows.read().await;
        Ok(rows.first().zip(rows.last()).map(|(a, b)| (a.depth, b.depth)))
    }

    async fn row_count(&self) -> DepthFrameResult<u64> {
        Ok(self.rows.read().await.len() as u64)
    }
}
