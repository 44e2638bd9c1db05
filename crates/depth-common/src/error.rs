//! Error types for the depth frame services.

use thiserror::Error;

/// Result type alias using DepthFrameError.
pub type DepthFrameResult<T> = Result<T, DepthFrameError>;

/// Primary error type for frame assembly, rendering and storage.
#[derive(Debug, Error)]
pub enum DepthFrameError {
    // === Request Errors ===
    #[error("Invalid depth range: depth_min ({depth_min}) must not exceed depth_max ({depth_max})")]
    InvalidDepthRange { depth_min: f64, depth_max: f64 },

    #[error("No scan rows found between {depth_min} and {depth_max}{}", describe_available(*.available))]
    EmptyRange {
        depth_min: f64,
        depth_max: f64,
        /// Stored depth bounds, when the store could report them.
        available: Option<(f64, f64)>,
    },

    #[error("Unknown colormap: '{name}'. Available: {}", available.join(", "))]
    UnknownColormap { name: String, available: Vec<String> },

    #[error("Unsupported output format: '{0}'. Supported formats: raw, png, jpeg")]
    UnsupportedFormat(String),

    // === Integrity Errors ===
    #[error("Row at depth {depth} has width {actual}, expected {expected}")]
    InconsistentWidth {
        depth: f64,
        expected: usize,
        actual: usize,
    },

    #[error("Rows out of depth order: {current} follows {previous}")]
    NonMonotonicDepth { previous: f64, current: f64 },

    // === Storage Errors ===
    #[error("Store is empty: run ingestion first")]
    StoreEmpty,

    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Rendering Errors ===
    #[error("Encoding failed: {0}")]
    EncodingError(String),

    // === Infrastructure Errors ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

fn describe_available(available: Option<(f64, f64)>) -> String {
    match available {
        Some((min, max)) => format!(". Available data range: [{}, {}]", min, max),
        None => String::new(),
    }
}

impl DepthFrameError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            DepthFrameError::InvalidDepthRange { .. } => "InvalidDepthRange",
            DepthFrameError::EmptyRange { .. } => "EmptyRange",
            DepthFrameError::UnknownColormap { .. } => "UnknownColormap",
            DepthFrameError::UnsupportedFormat(_) => "UnsupportedFormat",
            DepthFrameError::InconsistentWidth { .. } => "InconsistentWidth",
            DepthFrameError::NonMonotonicDepth { .. } => "NonMonotonicDepth",
            DepthFrameError::StoreEmpty => "StoreEmpty",
            DepthFrameError::DatabaseError(_) => "DatabaseError",
            DepthFrameError::EncodingError(_) => "EncodingError",
            DepthFrameError::InternalError(_) => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            DepthFrameError::InvalidDepthRange { .. }
            | DepthFrameError::UnknownColormap { .. }
            | DepthFrameError::UnsupportedFormat(_) => 400,

            DepthFrameError::EmptyRange { .. } => 404,

            DepthFrameError::StoreEmpty => 503,

            _ => 500,
        }
    }

    /// True when the error signals corrupted or misbehaving storage.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            DepthFrameError::InconsistentWidth { .. } | DepthFrameError::NonMonotonicDepth { .. }
        )
    }
}

impl From<std::io::Error> for DepthFrameError {
    fn from(err: std::io::Error) -> Self {
        DepthFrameError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for DepthFrameError {
    fn from(err: serde_json::Error) -> Self {
        DepthFrameError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        let err = DepthFrameError::EmptyRange {
            depth_min: 9999.0,
            depth_max: 10000.0,
            available: None,
        };
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(DepthFrameError::UnsupportedFormat("bmp".into()).http_status_code(), 400);
        assert_eq!(
            DepthFrameError::InvalidDepthRange { depth_min: 2.0, depth_max: 1.0 }.http_status_code(),
            400
        );
    }

    #[test]
    fn test_integrity_errors_map_to_500() {
        let err = DepthFrameError::NonMonotonicDepth { previous: 2.0, current: 1.0 };
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_integrity_violation());

        let err = DepthFrameError::InconsistentWidth { depth: 1.0, expected: 150, actual: 149 };
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_integrity_violation());
    }

    #[test]
    fn test_empty_range_message_reports_available_bounds() {
        let err = DepthFrameError::EmptyRange {
            depth_min: 1000.0,
            depth_max: 2000.0,
            available: Some((9000.0, 9546.0)),
        };
        let msg = err.to_string();
        assert!(msg.contains("No scan rows found between 1000 and 2000"));
        assert!(msg.contains("Available data range: [9000, 9546]"));
    }

    #[test]
    fn test_unknown_colormap_lists_choices() {
        let err = DepthFrameError::UnknownColormap {
            name: "jet".into(),
            available: vec!["gray".into(), "viridis".into()],
        };
        assert_eq!(err.to_string(), "Unknown colormap: 'jet'. Available: gray, viridis");
        assert_eq!(err.error_code(), "UnknownColormap");
    }
}
