//! Generators for synthetic scan data.
//!
//! Every generator is deterministic so tests can recompute the expected
//! bytes for any depth and column.

use depth_common::ScanRow;

/// Depth of the `index`-th row, snapped to 1e-6 so that generated depths
/// compare equal to their decimal literals (e.g. `9100.1`).
pub fn depth_at(start: f64, step: f64, index: usize) -> f64 {
    ((start + index as f64 * step) * 1e6).round() / 1e6
}

/// Intensity stored at `(row, col)` by [`create_scan_rows`].
pub fn pixel_at(row: usize, col: usize) -> u8 {
    ((row * 7 + col * 3) % 256) as u8
}

/// Creates `count` rows of `width` pixels with predictable values.
///
/// Row `i` sits at `depth_at(start, step, i)` and holds `pixel_at(i, col)`.
///
/// # Example
///
/// ```
/// use test_utils::create_scan_rows;
///
/// let rows = create_scan_rows(100.0, 0.5, 3, 4);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[2].depth, 101.0);
/// assert_eq!(rows[1].pixels, vec![7, 10, 13, 16]);
/// ```
pub fn create_scan_rows(start: f64, step: f64, count: usize, width: usize) -> Vec<ScanRow> {
    (0..count)
        .map(|i| {
            let pixels = (0..width).map(|col| pixel_at(i, col)).collect();
            ScanRow::new(depth_at(start, step, i), pixels)
        })
        .collect()
}

/// Creates rows where every pixel of row `i` equals `values[i]`.
pub fn create_constant_rows(start: f64, step: f64, values: &[u8], width: usize) -> Vec<ScanRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ScanRow::new(depth_at(start, step, i), vec![v; width]))
        .collect()
}

/// Renders a CSV document with a `depth` column followed by `pixel_N` columns.
///
/// `None` cells are written empty, the way a spreadsheet export marks
/// missing values.
pub fn create_csv(rows: &[(Option<f64>, Vec<Option<f64>>)], width: usize) -> String {
    let mut out = String::from("depth");
    for i in 0..width {
        out.push_str(&format!(",pixel_{}", i));
    }
    out.push('\n');

    for (depth, pixels) in rows {
        if let Some(d) = depth {
            out.push_str(&d.to_string());
        }
        for i in 0..width {
            out.push(',');
            if let Some(Some(v)) = pixels.get(i) {
                out.push_str(&v.to_string());
            }
        }
        out.push('\n');
    }
    out
}

/// CSV text for `count` fully populated rows at the original width.
pub fn create_scan_csv(start: f64, step: f64, count: usize, width: usize) -> String {
    let rows: Vec<(Option<f64>, Vec<Option<f64>>)> = create_scan_rows(start, step, count, width)
        .into_iter()
        .map(|r| {
            let pixels = r.pixels.iter().map(|&p| Some(p as f64)).collect();
            (Some(r.depth), pixels)
        })
        .collect();
    create_csv(&rows, width)
}
