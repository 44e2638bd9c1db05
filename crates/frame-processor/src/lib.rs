//! Depth-range frame assembly and rendering.
//!
//! The [`FrameService`] is the entry point for transport layers: it turns a
//! depth range, an optional colormap and an output format into encoded
//! bytes plus the metadata needed for response headers.
//!
//! ```rust,ignore
//! let service = FrameService::new(store, registry, Encoder::default());
//! let output = service.render(9100.0, 9200.0, Some("resistivity"), "png").await?;
//! assert_eq!(output.metadata.height, 1001);
//! ```

pub mod assembler;
pub mod request;
pub mod service;

pub use assembler::{stack_rows, FrameAssembler};
pub use request::RenderRequest;
pub use service::{FrameService, RenderMetadata, RenderedOutput};
