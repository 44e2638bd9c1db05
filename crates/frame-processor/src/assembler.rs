//! Stacking ordered scan rows into a validated frame.

use std::cmp::Ordering;
use std::sync::Arc;

use depth_common::{DepthFrameError, DepthFrameResult, DepthRange, ScanRow};
use renderer::Frame;
use storage::RowStore;
use tracing::debug;

/// Stack rows, in the order given, into a frame of `width` columns.
///
/// Fails with `EmptyRange` when `rows` is empty, `NonMonotonicDepth` when a
/// depth does not strictly exceed its predecessor, and `InconsistentWidth`
/// when a row is not exactly `width` bytes. Rows are never re-sorted.
pub fn stack_rows(range: DepthRange, rows: Vec<ScanRow>, width: usize) -> DepthFrameResult<Frame> {
    if rows.is_empty() {
        return Err(DepthFrameError::EmptyRange {
            depth_min: range.min,
            depth_max: range.max,
            available: None,
        });
    }

    let mut depths = Vec::with_capacity(rows.len());
    let mut pixels = Vec::with_capacity(rows.len() * width);
    let mut previous: Option<f64> = None;

    for row in rows {
        if let Some(prev) = previous {
            // NaN compares as None and is rejected too
            if row.depth.partial_cmp(&prev) != Some(Ordering::Greater) {
                return Err(DepthFrameError::NonMonotonicDepth {
                    previous: prev,
                    current: row.depth,
                });
            }
        }
        if row.pixels.len() != width {
            return Err(DepthFrameError::InconsistentWidth {
                depth: row.depth,
                expected: width,
                actual: row.pixels.len(),
            });
        }

        previous = Some(row.depth);
        depths.push(row.depth);
        pixels.extend_from_slice(&row.pixels);
    }

    Frame::new(depths, width, pixels)
}

/// Reads rows for a depth range from a store and assembles them.
#[derive(Clone)]
pub struct FrameAssembler {
    store: Arc<dyn RowStore>,
}

impl FrameAssembler {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Assemble every stored row with `depth_min <= depth <= depth_max`.
    pub async fn assemble(&self, depth_min: f64, depth_max: f64) -> DepthFrameResult<Frame> {
        let range = DepthRange::new(depth_min, depth_max)?;
        let metadata = self.store.get_metadata().await?;
        let rows = self.store.rows_in_range(range.min, range.max).await?;

        debug!(
            depth_min = range.min,
            depth_max = range.max,
            rows = rows.len(),
            width = metadata.width,
            "Fetched scan rows"
        );

        stack_rows(range, rows, metadata.width).map_err(|e| match e {
            DepthFrameError::EmptyRange {
                depth_min,
                depth_max,
                ..
            } => DepthFrameError::EmptyRange {
                depth_min,
                depth_max,
                available: Some((metadata.depth_min, metadata.depth_max)),
            },
            other => other,
        })
    }
}
