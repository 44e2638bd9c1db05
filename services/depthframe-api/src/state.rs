//! Application state shared by all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use frame_processor::FrameService;
use metrics_exporter_prometheus::PrometheusHandle;
use renderer::{ColormapRegistry, Encoder};
use storage::{RowStore, SqliteRowStore};
use tracing::info;

use crate::config::ServiceConfig;

pub struct AppState {
    pub frames: FrameService,
    /// Canonical name of the colormap applied when a request names none.
    pub default_colormap: String,
    /// Absent when no global recorder was installed (tests).
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Open the SQLite row store named by `config`.
    pub async fn new(config: &ServiceConfig) -> Result<Self> {
        let store = SqliteRowStore::open(&config.db_path)
            .await
            .with_context(|| format!("Failed to open row store at {}", config.db_path.display()))?;
        info!(db = %config.db_path.display(), "Opened row store");
        Self::with_store(Arc::new(store), &config.default_colormap, config.jpeg_quality)
    }

    /// Build state over any row store.
    ///
    /// Fails when `default_colormap` is not a built-in colormap.
    pub fn with_store(
        store: Arc<dyn RowStore>,
        default_colormap: &str,
        jpeg_quality: u8,
    ) -> Result<Self> {
        let registry = Arc::new(ColormapRegistry::with_defaults()?);
        let default_colormap = registry
            .get(default_colormap)
            .context("Invalid default colormap")?
            .name()
            .to_string();
        info!(
            colormaps = registry.len(),
            default = %default_colormap,
            "Colormap registry ready"
        );

        Ok(Self {
            frames: FrameService::new(store, registry, Encoder::new(jpeg_quality)),
            default_colormap,
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
