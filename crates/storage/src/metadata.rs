//! Dataset metadata keys and the mapping from key/value rows to
//! [`DatasetMetadata`].

use std::collections::BTreeMap;

use depth_common::{DatasetMetadata, DepthFrameError, DepthFrameResult, DEFAULT_COLORMAP};

/// Keys written to the metadata table by ingestion.
pub mod keys {
    pub const ORIGINAL_WIDTH: &str = "original_width";
    pub const RESIZED_WIDTH: &str = "resized_width";
    pub const DEPTH_MIN: &str = "depth_min";
    pub const DEPTH_MAX: &str = "depth_max";
    pub const DEPTH_STEP: &str = "depth_step";
    pub const ROW_COUNT: &str = "row_count";
    pub const INTERPOLATION_METHOD: &str = "interpolation_method";
    pub const SOURCE_FILE: &str = "source_file";
    pub const PIXEL_RANGE_ORIGINAL: &str = "pixel_range_original";
    pub const VALIDATION_SUMMARY: &str = "validation_summary";
    pub const INGESTED_AT: &str = "ingested_at";
    pub const COLORMAP_DEFAULT: &str = "colormap_default";
}

/// Build dataset metadata from stored key/value pairs plus live row facts.
///
/// Row count and depth bounds come from the rows themselves, so they stay
/// correct even if the metadata table is stale. The declared width is
/// `resized_width`, falling back to the width of the first stored row.
pub fn build_metadata(
    entries: BTreeMap<String, String>,
    row_count: u64,
    bounds: Option<(f64, f64)>,
    first_row_width: Option<usize>,
) -> DepthFrameResult<DatasetMetadata> {
    let (depth_min, depth_max) = match bounds {
        Some(b) if row_count > 0 => b,
        _ => return Err(DepthFrameError::StoreEmpty),
    };

    let width = parse_entry::<usize>(&entries, keys::RESIZED_WIDTH)
        .or(first_row_width)
        .ok_or_else(|| DepthFrameError::DatabaseError("Unable to determine row width".into()))?;

    Ok(DatasetMetadata {
        row_count,
        width,
        depth_min,
        depth_max,
        depth_step: parse_entry(&entries, keys::DEPTH_STEP),
        original_width: parse_entry(&entries, keys::ORIGINAL_WIDTH),
        interpolation_method: entries.get(keys::INTERPOLATION_METHOD).cloned(),
        source_file: entries.get(keys::SOURCE_FILE).cloned(),
        colormap_default: entries
            .get(keys::COLORMAP_DEFAULT)
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLORMAP.to_string()),
        provenance: entries,
    })
}

fn parse_entry<T: std::str::FromStr>(entries: &BTreeMap<String, String>, key: &str) -> Option<T> {
    entries.get(key).and_then(|v| v.trim().parse().ok())
}
