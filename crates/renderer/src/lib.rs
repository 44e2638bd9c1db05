//! Frame rendering for depth-indexed scan images.
//!
//! - [`frame`]: assembled grayscale and colormapped frames
//! - [`colormap`]: lookup-table colormaps and their registry
//! - [`png`]: hand-written PNG writer (grayscale, indexed, RGB)
//! - [`encoder`]: raw / PNG / JPEG serialization with response metadata

pub mod colormap;
pub mod encoder;
pub mod frame;
pub mod png;
mod viridis;

pub use colormap::{Colormap, ColormapInfo, ColormapRegistry, ColormapRegistryBuilder};
pub use encoder::{EncodedImage, Encoder, FrameData, ImageMetadata, DEFAULT_JPEG_QUALITY};
pub use frame::{ColorFrame, Frame};
