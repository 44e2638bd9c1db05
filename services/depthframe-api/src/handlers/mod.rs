//! HTTP request handlers.

pub mod dataset;
pub mod health;
pub mod image;

pub use dataset::{colormaps_handler, metadata_handler};
pub use health::{health_handler, metrics_handler};
pub use image::{image_handler, raw_image_handler};
