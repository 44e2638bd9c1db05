//! Scan data ingestion library.
//!
//! Turns a depth-indexed CSV export into stored scan rows:
//!
//! 1. [`load_csv`]: parse the header and cells, keeping missing values
//! 2. [`validate_and_clean`]: drop unusable rows, sort, dedupe, fill, clip
//! 3. [`resize_rows`]: resample every row to the target width
//! 4. [`store_rows`]: write rows and provenance metadata to SQLite
//!
//! [`run_ingestion`] runs all four steps from an [`IngestionConfig`].

pub mod config;
pub mod csv;
pub mod error;
pub mod pipeline;
pub mod resize;
pub mod validate;

pub use config::IngestionConfig;
pub use csv::{load_csv, parse_csv, ScanTable};
pub use error::{IngestionError, Result};
pub use pipeline::{run_ingestion, store_rows, IngestionSummary};
pub use resize::{resize_rows, InterpolationMethod};
pub use validate::{validate_and_clean, CleanScans, ValidationReport};
