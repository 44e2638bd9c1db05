//! Serialization of frames into raw bytes, PNG or JPEG.

use std::io::Cursor;

use depth_common::{DepthFrameError, DepthFrameResult, OutputFormat};
use serde::Serialize;

use crate::frame::{ColorFrame, Frame};
use crate::png;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Frame handed to the encoder.
#[derive(Debug, Clone, Copy)]
pub enum FrameData<'a> {
    Gray(&'a Frame),
    Color(&'a ColorFrame),
}

impl FrameData<'_> {
    pub fn width(&self) -> usize {
        match self {
            FrameData::Gray(f) => f.width(),
            FrameData::Color(f) => f.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            FrameData::Gray(f) => f.height(),
            FrameData::Color(f) => f.height,
        }
    }

    pub fn is_color(&self) -> bool {
        matches!(self, FrameData::Color(_))
    }

    fn colormap_name(&self) -> Option<String> {
        match self {
            FrameData::Gray(_) => None,
            FrameData::Color(f) => Some(f.colormap.clone()),
        }
    }
}

/// Dimensions and colormap of an encoded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub height: usize,
    pub width: usize,
    pub colormap_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub metadata: ImageMetadata,
}

/// Stateless frame encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    jpeg_quality: u8,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Encoder {
    /// Quality is clamped into `1..=100`.
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Encode using a format name such as `"png"`.
    pub fn encode_named(&self, data: FrameData<'_>, format: &str) -> DepthFrameResult<EncodedImage> {
        self.encode(data, format.parse()?)
    }

    pub fn encode(&self, data: FrameData<'_>, format: OutputFormat) -> DepthFrameResult<EncodedImage> {
        let bytes = match (format, data) {
            (OutputFormat::Raw, FrameData::Gray(frame)) => frame.pixels().to_vec(),
            (OutputFormat::Raw, FrameData::Color(_)) => {
                return Err(DepthFrameError::EncodingError(
                    "Raw output requires a grayscale frame".into(),
                ))
            }
            (OutputFormat::Png, FrameData::Gray(frame)) => {
                png::create_png_gray(frame.pixels(), frame.width(), frame.height())
                    .map_err(DepthFrameError::EncodingError)?
            }
            (OutputFormat::Png, FrameData::Color(frame)) => {
                png::create_png_auto(&frame.pixels, frame.width, frame.height)
                    .map_err(DepthFrameError::EncodingError)?
            }
            (OutputFormat::Jpeg, FrameData::Gray(frame)) => self.encode_jpeg(
                frame.pixels(),
                frame.width(),
                frame.height(),
                image::ColorType::L8,
            )?,
            (OutputFormat::Jpeg, FrameData::Color(frame)) => self.encode_jpeg(
                &frame.pixels,
                frame.width,
                frame.height,
                image::ColorType::Rgb8,
            )?,
        };

        Ok(EncodedImage {
            format,
            bytes,
            content_type: format.mime_type(),
            metadata: ImageMetadata {
                height: data.height(),
                width: data.width(),
                colormap_name: data.colormap_name(),
            },
        })
    }

    fn encode_jpeg(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        color_type: image::ColorType,
    ) -> DepthFrameResult<Vec<u8>> {
        let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w as u32, h as u32),
            _ => {
                return Err(DepthFrameError::EncodingError(format!(
                    "JPEG dimensions {}x{} exceed 65535",
                    width, height
                )))
            }
        };

        let mut jpeg_data = Vec::new();
        let mut cursor = Cursor::new(&mut jpeg_data);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.jpeg_quality);
        encoder
            .encode(pixels, w, h, color_type)
            .map_err(|e| DepthFrameError::EncodingError(format!("Failed to encode JPEG: {}", e)))?;

        Ok(jpeg_data)
    }
}
