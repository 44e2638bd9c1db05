//! DepthFrame HTTP API.
//!
//! Serves depth-range frames from the row store, colormapped and encoded
//! per request. Routes live under `/api/v1/`; `/health` and `/metrics` sit
//! at the root for orchestration.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, http::Method, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServiceConfig;
pub use error::ApiError;
pub use state::AppState;

/// Build the application router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/api/v1/image", get(handlers::image_handler))
        .route("/api/v1/image/raw", get(handlers::raw_image_handler))
        .route("/api/v1/metadata", get(handlers::metadata_handler))
        .route("/api/v1/colormaps", get(handlers::colormaps_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
