//! Common types and utilities shared across all depth frame services.

pub mod error;
pub mod format;
pub mod scan;

pub use error::{DepthFrameError, DepthFrameResult};
pub use format::OutputFormat;
pub use scan::{DatasetMetadata, DepthRange, ScanRow};

/// Colormap used when neither the request nor the dataset names one.
pub const DEFAULT_COLORMAP: &str = "resistivity";
