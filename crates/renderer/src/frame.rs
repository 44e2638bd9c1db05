//! Assembled grayscale and colormapped frames.

use depth_common::{DepthFrameError, DepthFrameResult};

/// A rectangular grayscale image built from consecutive scan rows.
///
/// Row `i` of `pixels` corresponds to `depths[i]`; depths are strictly
/// ascending and every row is exactly `width` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    depths: Vec<f64>,
    width: usize,
    height: usize,
    /// Row-major intensities, `height * width` bytes.
    pixels: Vec<u8>,
}

impl Frame {
    /// Wrap already-stacked pixels. Fails if the buffer is not
    /// `depths.len() * width` bytes or the frame would be empty.
    pub fn new(depths: Vec<f64>, width: usize, pixels: Vec<u8>) -> DepthFrameResult<Self> {
        let height = depths.len();
        if height == 0 || width == 0 {
            return Err(DepthFrameError::InternalError(format!(
                "Frame must be non-empty, got {}x{}",
                height, width
            )));
        }
        if pixels.len() != height * width {
            return Err(DepthFrameError::InternalError(format!(
                "Frame buffer holds {} bytes, expected {}",
                pixels.len(),
                height * width
            )));
        }
        Ok(Self {
            depths,
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn row(&self, index: usize) -> Option<&[u8]> {
        if index >= self.height {
            return None;
        }
        let start = index * self.width;
        Some(&self.pixels[start..start + self.width])
    }

    pub fn depth_first(&self) -> f64 {
        self.depths.first().copied().unwrap_or(f64::NAN)
    }

    pub fn depth_last(&self) -> f64 {
        self.depths.last().copied().unwrap_or(f64::NAN)
    }
}

/// A frame after colormap application: `height * width * 3` RGB bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub colormap: String,
}

impl ColorFrame {
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }
}
