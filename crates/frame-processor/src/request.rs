//! Validated render requests.

use depth_common::{DepthFrameResult, DepthRange, OutputFormat};

/// A render call with its inputs parsed.
///
/// Parsing happens before any store access so malformed requests never
/// touch the database.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub range: DepthRange,
    /// Requested colormap name as given by the caller. Ignored for raw output.
    pub colormap: Option<String>,
    pub format: OutputFormat,
}

impl RenderRequest {
    pub fn new(
        depth_min: f64,
        depth_max: f64,
        colormap: Option<&str>,
        format: &str,
    ) -> DepthFrameResult<Self> {
        let format: OutputFormat = format.parse()?;
        let range = DepthRange::new(depth_min, depth_max)?;
        Ok(Self {
            range,
            colormap: colormap.map(str::to_string),
            format,
        })
    }

    /// Grayscale bytes for a depth range.
    pub fn raw(depth_min: f64, depth_max: f64) -> DepthFrameResult<Self> {
        Self::new(depth_min, depth_max, None, "raw")
    }

    /// Colormap actually applied: raw output never carries one.
    pub fn effective_colormap(&self) -> Option<&str> {
        if self.format.is_image() {
            self.colormap.as_deref()
        } else {
            None
        }
    }
}
