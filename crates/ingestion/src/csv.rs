//! Loading depth-indexed scan CSV exports.
//!
//! The expected layout is a header row with a `depth` column and one column
//! per pixel. Empty cells and `nan` mark missing values; they are kept as
//! `None` so cleaning can decide what to do with them.

use std::path::Path;

use tracing::info;

use crate::error::{IngestionError, Result};

/// Parsed CSV contents before any cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanTable {
    /// Names of the pixel columns, in file order.
    pub pixel_columns: Vec<String>,
    pub depths: Vec<Option<f64>>,
    /// One entry per data line, each `pixel_columns.len()` long.
    pub pixels: Vec<Vec<Option<f64>>>,
}

impl ScanTable {
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn width(&self) -> usize {
        self.pixel_columns.len()
    }
}

/// Read and parse a CSV file.
pub fn load_csv(path: &Path) -> Result<ScanTable> {
    if !path.exists() {
        return Err(IngestionError::DataFileNotFound(path.to_path_buf()));
    }

    info!(path = %path.display(), "Loading CSV");
    let text = std::fs::read_to_string(path)?;
    let table = parse_csv(&text)?;
    info!(rows = table.len(), columns = table.width() + 1, "Loaded CSV");
    Ok(table)
}

/// Parse CSV text. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Result<ScanTable> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let (_, header) = lines.next().ok_or(IngestionError::CsvParse {
        line: 1,
        message: "file is empty".into(),
    })?;

    let columns: Vec<String> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect();

    let depth_col = columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case("depth"))
        .ok_or(IngestionError::MissingDepthColumn)?;

    let pixel_columns: Vec<String> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != depth_col)
        .map(|(_, c)| c.clone())
        .collect();

    let mut depths = Vec::new();
    let mut pixels = Vec::new();

    for (idx, line) in lines {
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() > columns.len() {
            return Err(IngestionError::CsvParse {
                line: idx + 1,
                message: format!("expected {} fields, found {}", columns.len(), cells.len()),
            });
        }

        let mut row = Vec::with_capacity(pixel_columns.len());
        let mut depth = None;
        for col in 0..columns.len() {
            let value = parse_cell(cells.get(col).copied().unwrap_or(""))
                .map_err(|message| IngestionError::CsvParse { line: idx + 1, message })?;
            if col == depth_col {
                depth = value;
            } else {
                row.push(value);
            }
        }

        depths.push(depth);
        pixels.push(row);
    }

    Ok(ScanTable {
        pixel_columns,
        depths,
        pixels,
    })
}

fn parse_cell(cell: &str) -> std::result::Result<Option<f64>, String> {
    let cell = cell.trim().trim_matches('"');
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| format!("invalid number '{}'", cell))
}
