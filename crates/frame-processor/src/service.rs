//! High-level render service.
//!
//! `FrameService` owns the three collaborators of a render: the row store,
//! the frozen colormap registry and the encoder. It is cheap to clone and is
//! shared by every request handler.

use std::sync::Arc;

use depth_common::{DatasetMetadata, DepthFrameError, DepthFrameResult, OutputFormat};
use renderer::{ColormapInfo, ColormapRegistry, EncodedImage, Encoder, Frame, FrameData};
use serde::Serialize;
use storage::RowStore;
use tracing::{debug, instrument};

use crate::assembler::FrameAssembler;
use crate::request::RenderRequest;

/// Response metadata, sourced for transport headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderMetadata {
    pub height: usize,
    pub width: usize,
    pub colormap_name: Option<String>,
    /// Depth of the first row in the frame.
    pub depth_first: f64,
    /// Depth of the last row in the frame.
    pub depth_last: f64,
}

/// Encoded frame plus everything a transport layer needs to answer.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub metadata: RenderMetadata,
}

#[derive(Clone)]
pub struct FrameService {
    store: Arc<dyn RowStore>,
    assembler: FrameAssembler,
    registry: Arc<ColormapRegistry>,
    encoder: Encoder,
}

impl FrameService {
    pub fn new(store: Arc<dyn RowStore>, registry: Arc<ColormapRegistry>, encoder: Encoder) -> Self {
        Self {
            assembler: FrameAssembler::new(store.clone()),
            store,
            registry,
            encoder,
        }
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ColormapRegistry> {
        &self.registry
    }

    /// Render a depth range.
    ///
    /// `colormap` applies to `png` and `jpeg` only; raw output is always the
    /// stored grayscale bytes.
    pub async fn render(
        &self,
        depth_min: f64,
        depth_max: f64,
        colormap: Option<&str>,
        format: &str,
    ) -> DepthFrameResult<RenderedOutput> {
        let request = RenderRequest::new(depth_min, depth_max, colormap, format)?;
        self.render_request(&request).await
    }

    #[instrument(skip(self), fields(format = %request.format))]
    pub async fn render_request(&self, request: &RenderRequest) -> DepthFrameResult<RenderedOutput> {
        // Resolve the colormap before touching the store
        let colormap = match request.effective_colormap() {
            Some(name) => Some(self.registry.get(name)?.name().to_string()),
            None => None,
        };

        let frame = self
            .assembler
            .assemble(request.range.min, request.range.max)
            .await?;

        debug!(
            rows = frame.height(),
            width = frame.width(),
            colormap = colormap.as_deref().unwrap_or("none"),
            "Assembled frame"
        );

        let registry = self.registry.clone();
        let encoder = self.encoder;
        let format = request.format;

        tokio::task::spawn_blocking(move || {
            encode_frame(&registry, encoder, frame, colormap.as_deref(), format)
        })
        .await
        .map_err(|e| DepthFrameError::InternalError(format!("Render task failed: {}", e)))?
    }

    /// Built-in colormaps in name order.
    pub fn list_colormaps(&self) -> Vec<ColormapInfo> {
        self.registry.list_colormaps()
    }

    pub async fn metadata(&self) -> DepthFrameResult<DatasetMetadata> {
        self.store.get_metadata().await
    }
}

/// Colorize (when asked) and encode an assembled frame.
fn encode_frame(
    registry: &ColormapRegistry,
    encoder: Encoder,
    frame: Frame,
    colormap: Option<&str>,
    format: OutputFormat,
) -> DepthFrameResult<RenderedOutput> {
    let encoded: EncodedImage = match colormap {
        Some(name) => {
            let cmap = registry.get(name)?;
            if cmap.is_identity() {
                // Identity output is the grayscale image itself
                let mut out = encoder.encode(FrameData::Gray(&frame), format)?;
                out.metadata.colormap_name = Some(cmap.name().to_string());
                out
            } else {
                let colored = cmap.apply(&frame);
                encoder.encode(FrameData::Color(&colored), format)?
            }
        }
        None => encoder.encode(FrameData::Gray(&frame), format)?,
    };

    Ok(RenderedOutput {
        format: encoded.format,
        bytes: encoded.bytes,
        content_type: encoded.content_type,
        metadata: RenderMetadata {
            height: encoded.metadata.height,
            width: encoded.metadata.width,
            colormap_name: encoded.metadata.colormap_name,
            depth_first: frame.depth_first(),
            depth_last: frame.depth_last(),
        },
    })
}
