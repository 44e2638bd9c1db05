//! Error types for the ingestion crate.

use std::path::PathBuf;

use depth_common::DepthFrameError;
use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Data file not found: {}. Place the CSV in the data directory or pass --csv.", .0.display())]
    DataFileNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("CSV has no 'depth' column")]
    MissingDepthColumn,

    #[error("No usable rows left after cleaning")]
    NoData,

    #[error("Unknown interpolation method: '{name}'. Available: {}", available.join(", "))]
    UnknownInterpolation {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DepthFrameError),

    #[error("Ingestion task failed: {0}")]
    Task(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
