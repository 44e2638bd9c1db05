//! Data quality checks and cleaning.

use serde::Serialize;
use tracing::{info, warn};

use crate::csv::ScanTable;
use crate::error::{IngestionError, Result};

/// Summary of the checks performed while cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub null_rows_dropped: usize,
    pub duplicate_depths_dropped: usize,
    pub depth_min: f64,
    pub depth_max: f64,
    /// Median spacing between consecutive depths; `None` for a single row.
    pub depth_step: Option<f64>,
    pub is_monotonic: bool,
    /// Pixel extremes before clipping.
    pub pixel_min: f64,
    pub pixel_max: f64,
    pub original_width: usize,
}

/// Cleaned scans at the original width.
#[derive(Debug, Clone)]
pub struct CleanScans {
    /// Strictly ascending depths.
    pub depths: Vec<f64>,
    /// Row-major pixels in `[0, 255]`, `depths.len() * width` values.
    pub pixels: Vec<f64>,
    pub width: usize,
    pub report: ValidationReport,
}

/// Validate a parsed table and return clean, sorted rows.
///
/// - Rows with every cell missing are dropped.
/// - Rows without a depth are dropped.
/// - Rows are sorted by depth; repeated depths keep the first row.
/// - Missing pixels take the mean of the row's present pixels (0 if none).
/// - Pixels are clipped into `[0, 255]`.
pub fn validate_and_clean(table: ScanTable) -> Result<CleanScans> {
    let raw_rows = table.len();
    let width = table.width();

    let mut rows: Vec<(f64, Vec<Option<f64>>)> = Vec::with_capacity(raw_rows);
    let mut null_rows = 0usize;
    let mut null_depth_rows = 0usize;

    for (depth, pixels) in table.depths.into_iter().zip(table.pixels) {
        match depth {
            None if pixels.iter().all(Option::is_none) => null_rows += 1,
            None => null_depth_rows += 1,
            Some(d) => rows.push((d, pixels)),
        }
    }

    if null_rows > 0 {
        info!(count = null_rows, "Dropping fully-null rows");
    }
    if null_depth_rows > 0 {
        warn!(count = null_depth_rows, "Dropping rows with null depth");
    }

    // Stable sort keeps file order among equal depths, so dedup keeps the first
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let before_dedup = rows.len();
    rows.dedup_by(|later, earlier| later.0 == earlier.0);
    let duplicates = before_dedup - rows.len();
    if duplicates > 0 {
        warn!(count = duplicates, "Dropping duplicate depth entries");
    }

    if rows.is_empty() {
        return Err(IngestionError::NoData);
    }

    let mut depths = Vec::with_capacity(rows.len());
    let mut pixels = Vec::with_capacity(rows.len() * width);
    let mut filled_rows = 0usize;

    for (depth, cells) in rows {
        let present: Vec<f64> = cells.iter().flatten().copied().collect();
        if present.len() < cells.len() {
            filled_rows += 1;
        }
        let mean = if present.is_empty() {
            0.0
        } else {
            present.iter().sum::<f64>() / present.len() as f64
        };
        depths.push(depth);
        pixels.extend(cells.into_iter().map(|c| c.unwrap_or(mean)));
    }

    if filled_rows > 0 {
        warn!(rows = filled_rows, "Filled missing pixels with row mean");
    }

    let (pixel_min, pixel_max) = pixels
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if pixel_min < 0.0 || pixel_max > 255.0 {
        warn!(pixel_min, pixel_max, "Pixel values outside [0, 255], clipping");
        for v in pixels.iter_mut() {
            *v = v.clamp(0.0, 255.0);
        }
    }

    let diffs: Vec<f64> = depths.windows(2).map(|w| w[1] - w[0]).collect();
    let is_monotonic = diffs.iter().all(|&d| d > 0.0);

    let report = ValidationReport {
        raw_rows,
        clean_rows: depths.len(),
        null_rows_dropped: null_rows,
        duplicate_depths_dropped: duplicates,
        depth_min: depths[0],
        depth_max: depths[depths.len() - 1],
        depth_step: median(diffs),
        is_monotonic,
        pixel_min: if width == 0 { 0.0 } else { pixel_min },
        pixel_max: if width == 0 { 0.0 } else { pixel_max },
        original_width: width,
    };

    info!(
        clean_rows = report.clean_rows,
        depth_min = report.depth_min,
        depth_max = report.depth_max,
        pixel_min = report.pixel_min,
        pixel_max = report.pixel_max,
        "Validation complete"
    );

    Ok(CleanScans {
        depths,
        pixels,
        width,
        report,
    })
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_fill_with_row_mean() {
        let table = parse_csv("depth,a,b,c\n1.0,100,,200\n").unwrap();
        let clean = validate_and_clean(table).unwrap();
        assert_eq!(clean.pixels, vec![100.0, 150.0, 200.0]);
    }

    #[test]
    fn test_row_without_pixels_fills_zero() {
        let table = parse_csv("depth,a,b\n1.0,,\n").unwrap();
        let clean = validate_and_clean(table).unwrap();
        assert_eq!(clean.pixels, vec![0.0, 0.0]);
    }

    #[test]
    fn test_only_null_rows_is_no_data() {
        let table = parse_csv("depth,a\n,\n,\n").unwrap();
        assert!(matches!(validate_and_clean(table), Err(IngestionError::NoData)));
    }
}
