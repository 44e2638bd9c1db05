//! Read interface shared by every row store backend.

use async_trait::async_trait;
use depth_common::{DatasetMetadata, DepthFrameResult, ScanRow};

/// Depth-keyed grayscale row storage.
///
/// Implementations return rows ordered by ascending depth. Consumers still
/// verify the order, so a misbehaving backend surfaces as an integrity error
/// rather than a silently scrambled image.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows with `depth_min <= depth <= depth_max`, ascending by depth.
    async fn rows_in_range(&self, depth_min: f64, depth_max: f64) -> DepthFrameResult<Vec<ScanRow>>;

    /// Dataset description. Fails with `StoreEmpty` before ingestion.
    async fn get_metadata(&self) -> DepthFrameResult<DatasetMetadata>;

    /// Smallest and largest stored depth, `None` when empty.
    async fn depth_bounds(&self) -> DepthFrameResult<Option<(f64, f64)>>;

    async fn row_count(&self) -> DepthFrameResult<u64>;

    async fn is_populated(&self) -> DepthFrameResult<bool> {
        Ok(self.row_count().await? > 0)
    }
}
