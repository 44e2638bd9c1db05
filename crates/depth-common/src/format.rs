//! Output encodings supported by the frame encoder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DepthFrameError;

/// Serialization format for a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Unmodified grayscale bytes, row-major, one byte per pixel.
    Raw,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "application/octet-stream",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Image containers are the only formats a colormap applies to.
    pub fn is_image(&self) -> bool {
        !matches!(self, OutputFormat::Raw)
    }
}

impl FromStr for OutputFormat {
    type Err = DepthFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            _ => Err(DepthFrameError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
