//! Frame rendering endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use frame_processor::RenderedOutput;
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

const FRAME_DEPTH_MIN: &str = "x-frame-depth-min";
const FRAME_DEPTH_MAX: &str = "x-frame-depth-max";
const FRAME_ROWS: &str = "x-frame-rows";
const FRAME_WIDTH: &str = "x-frame-width";
const COLORMAP: &str = "x-colormap";
const DTYPE: &str = "x-dtype";

#[derive(Debug, Deserialize)]
pub struct ImageParams {
    pub depth_min: f64,
    pub depth_max: f64,
    pub colormap: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawParams {
    pub depth_min: f64,
    pub depth_max: f64,
}

/// GET /api/v1/image - Colormapped frame for a depth range
pub async fn image_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<ImageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    metrics::record_request("image");
    let Query(params) = params?;

    let colormap = params
        .colormap
        .unwrap_or_else(|| state.default_colormap.clone());
    let format = params.format.as_deref().unwrap_or("png");

    let start = Instant::now();
    let output = state
        .frames
        .render(params.depth_min, params.depth_max, Some(&colormap), format)
        .await?;
    metrics::record_render(output.format.as_str(), output.metadata.height, start.elapsed());

    info!(
        depth_min = params.depth_min,
        depth_max = params.depth_max,
        rows = output.metadata.height,
        width = output.metadata.width,
        colormap = output.metadata.colormap_name.as_deref().unwrap_or("none"),
        format = %output.format,
        "Serving frame"
    );

    Ok(frame_response(output))
}

/// GET /api/v1/image/raw - Stored grayscale bytes, row-major
pub async fn raw_image_handler(
    Extension(state): Extension<Arc<AppState>>,
    params: Result<Query<RawParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    metrics::record_request("image_raw");
    let Query(params) = params?;

    let start = Instant::now();
    let output = state
        .frames
        .render(params.depth_min, params.depth_max, None, "raw")
        .await?;
    metrics::record_render(output.format.as_str(), output.metadata.height, start.elapsed());

    let mut response = frame_response(output);
    response
        .headers_mut()
        .insert(HeaderName::from_static(DTYPE), HeaderValue::from_static("uint8"));
    Ok(response)
}

fn frame_response(output: RenderedOutput) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(output.content_type));
    insert_header(&mut headers, FRAME_DEPTH_MIN, format_depth(output.metadata.depth_first));
    insert_header(&mut headers, FRAME_DEPTH_MAX, format_depth(output.metadata.depth_last));
    headers.insert(HeaderName::from_static(FRAME_ROWS), HeaderValue::from(output.metadata.height));
    headers.insert(HeaderName::from_static(FRAME_WIDTH), HeaderValue::from(output.metadata.width));
    if let Some(name) = output.metadata.colormap_name {
        insert_header(&mut headers, COLORMAP, name);
    }

    (headers, output.bytes).into_response()
}

/// Depths always carry a fractional part, e.g. `9100.0`.
fn format_depth(depth: f64) -> String {
    format!("{:?}", depth)
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: String) {
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}
