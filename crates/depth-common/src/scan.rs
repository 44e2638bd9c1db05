//! Depth-indexed scan rows and the dataset description stored next to them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DepthFrameError, DepthFrameResult};

/// One stored scanline: a depth key and a fixed-width row of intensities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub depth: f64,
    pub pixels: Vec<u8>,
}

impl ScanRow {
    pub fn new(depth: f64, pixels: Vec<u8>) -> Self {
        Self { depth, pixels }
    }

    pub fn width(&self) -> usize {
        self.pixels.len()
    }
}

/// Inclusive depth interval used for range queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f64,
    pub max: f64,
}

impl DepthRange {
    /// Build a validated range. `min == max` is a single-depth query.
    pub fn new(min: f64, max: f64) -> DepthFrameResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(DepthFrameError::InvalidDepthRange {
                depth_min: min,
                depth_max: max,
            });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min && depth <= self.max
    }
}

/// Description of the ingested dataset, assembled from the store's
/// metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub row_count: u64,
    /// Declared row width every stored row must have.
    pub width: usize,
    pub depth_min: f64,
    pub depth_max: f64,
    pub depth_step: Option<f64>,
    pub original_width: Option<usize>,
    pub interpolation_method: Option<String>,
    pub source_file: Option<String>,
    pub colormap_default: String,
    /// Every key/value pair written at ingestion time.
    #[serde(default)]
    pub provenance: BTreeMap<String, String>,
}

impl DatasetMetadata {
    pub fn depth_range(&self) -> DepthRange {
        DepthRange {
            min: self.depth_min,
            max: self.depth_max,
        }
    }
}
