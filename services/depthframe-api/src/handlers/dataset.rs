//! Dataset and colormap description endpoints.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use renderer::ColormapInfo;
use serde::Serialize;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub depth_min: f64,
    pub depth_max: f64,
    pub depth_step: Option<f64>,
    pub row_count: u64,
    pub original_width: Option<usize>,
    pub resized_width: usize,
    pub interpolation_method: Option<String>,
    pub source_file: Option<String>,
    pub colormap_default: String,
    pub available_colormaps: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ColormapListResponse {
    pub colormaps: Vec<ColormapInfo>,
    pub default: String,
}

/// GET /api/v1/metadata - Dataset bounds and processing provenance
pub async fn metadata_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<MetadataResponse>, ApiError> {
    metrics::record_request("metadata");
    let meta = state.frames.metadata().await?;

    Ok(Json(MetadataResponse {
        depth_min: meta.depth_min,
        depth_max: meta.depth_max,
        depth_step: meta.depth_step,
        row_count: meta.row_count,
        original_width: meta.original_width,
        resized_width: meta.width,
        interpolation_method: meta.interpolation_method,
        source_file: meta.source_file,
        colormap_default: meta.colormap_default,
        available_colormaps: state.frames.registry().list_names(),
    }))
}

/// GET /api/v1/colormaps
pub async fn colormaps_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ColormapListResponse> {
    metrics::record_request("colormaps");
    Json(ColormapListResponse {
        colormaps: state.frames.list_colormaps(),
        default: state.default_colormap.clone(),
    })
}
